// Copyright 2024-2026 Rajya Sabha Predictor Developers.
// This file is part of rajya-sabha-predictor.

// rajya-sabha-predictor is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// rajya-sabha-predictor is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with rajya-sabha-predictor.  If not, see <http://www.gnu.org/licenses/>.

use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
	time::{Duration, Instant},
};

pin_project! {
	pub struct Timed<Fut>
		where
		Fut: Future,
	{
		#[pin]
		inner: Fut,
		start: Option<Instant>,
	}
}

impl<Fut> Future for Timed<Fut>
where
	Fut: Future,
{
	type Output = (Fut::Output, Duration);

	fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
		let this = self.project();
		let start = this.start.get_or_insert_with(Instant::now);

		match this.inner.poll(cx) {
			Poll::Pending => Poll::Pending,
			Poll::Ready(v) => {
				let elapsed = start.elapsed();
				Poll::Ready((v, elapsed))
			},
		}
	}
}

pub trait TimedFuture: Sized + Future {
	fn timed(self) -> Timed<Self> {
		Timed { inner: self, start: None }
	}
}

impl<F: Future> TimedFuture for F {}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
	let factor = 10f64.powi(decimals);
	(value * factor).round() / factor
}

/// Decode `%XX` escapes. Malformed escapes are kept as they are.
pub fn percent_decode(input: &str) -> String {
	let bytes = input.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' && i + 2 < bytes.len() {
			if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
				out.push(hi << 4 | lo);
				i += 3;
				continue;
			}
		}
		out.push(bytes[i]);
		i += 1;
	}
	String::from_utf8_lossy(&out).into_owned()
}

/// Look up `key` in a `application/x-www-form-urlencoded` query string.
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
	query?.split('&').find_map(|pair| {
		let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
		(percent_decode(&k.replace('+', " ")) == key).then(|| percent_decode(&v.replace('+', " ")))
	})
}

fn hex(b: u8) -> Option<u8> {
	match b {
		b'0'..=b'9' => Some(b - b'0'),
		b'a'..=b'f' => Some(b - b'a' + 10),
		b'A'..=b'F' => Some(b - b'A' + 10),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounding() {
		assert_eq!(round_to(71.23456, 2), 71.23);
		assert_eq!(round_to(58.0555, 1), 58.1);
		assert_eq!(round_to(49.995, 0), 50.0);
	}

	#[test]
	fn decodes_party_names() {
		assert_eq!(percent_decode("SS%28UBT%29"), "SS(UBT)");
		assert_eq!(percent_decode("NCP%20(Sharad)"), "NCP (Sharad)");
		assert_eq!(percent_decode("100%"), "100%");
		assert_eq!(percent_decode("%zz"), "%zz");
	}

	#[test]
	fn finds_query_params() {
		assert_eq!(query_param(Some("year=2030&x=1"), "year").as_deref(), Some("2030"));
		assert_eq!(query_param(Some("party=NCP+%28Ajit%29"), "party").as_deref(), Some("NCP (Ajit)"));
		assert_eq!(query_param(Some("x=1"), "year"), None);
		assert_eq!(query_param(None, "year"), None);
	}

	#[tokio::test]
	async fn timed_reports_elapsed() {
		let (value, elapsed) = async { 7 }.timed().await;
		assert_eq!(value, 7);
		assert!(elapsed < Duration::from_secs(5));
	}
}
