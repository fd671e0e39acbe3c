//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"
//! - LOG_MAX_SIZE: maximum size of a log file before rolling, either plain
//!   bytes or a human-readable size like "1GB"; default is 1GiB
//! - IN_DOCKER: "true" if running in Docker; default is "false"

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::info;
use tracing_appender;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::utils::parsing::parse_string_to_bytes_size;

const DEFAULT_LOG_DIR: &str = "logs/";
const DEFAULT_MAX_LOG_SIZE: u64 = 1024 * 1024 * 1024;

lazy_static! {
	// Matches the common color-code escape sequences
	static ref ANSI_ESCAPE: regex::Regex =
		regex::Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ANSI escape pattern");
}

/// Where log output goes, per LOG_MODE.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LogDestination {
	Stdout,
	File,
}

/// Logging settings assembled from the environment.
struct LogSettings {
	destination: LogDestination,
	level: tracing::Level,
	directory: String,
	max_size: u64,
}

impl LogSettings {
	fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
		let destination = match env::var("LOG_MODE")
			.unwrap_or_else(|_| "stdout".to_string())
			.to_lowercase()
			.as_str()
		{
			"file" => LogDestination::File,
			_ => LogDestination::Stdout,
		};

		let level = env::var("LOG_LEVEL")
			.unwrap_or_else(|_| "info".to_string())
			.to_lowercase()
			.parse::<tracing::Level>()
			.unwrap_or(tracing::Level::INFO);

		// Containers always log under logs/; hosts may override the directory
		let in_docker = env::var("IN_DOCKER").map(|v| v == "true").unwrap_or(false);
		let directory = if in_docker {
			DEFAULT_LOG_DIR.to_string()
		} else {
			env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string())
		};

		let max_size = match env::var("LOG_MAX_SIZE") {
			Ok(raw) => parse_string_to_bytes_size(&raw)
				.map_err(|e| format!("LOG_MAX_SIZE is not a valid size: {}", e))?,
			Err(_) => DEFAULT_MAX_LOG_SIZE,
		};

		Ok(Self {
			destination,
			level,
			directory,
			max_size,
		})
	}
}

/// Formatter wrapper that strips ANSI escape codes before writing.
///
/// File output goes through this so rolled log files stay free of color
/// codes even when a layer upstream emits them.
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<T> StripAnsiFormatter<T> {
	fn new(inner: T) -> Self {
		Self { inner }
	}
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

/// Strips ANSI escape codes from a string
fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

/// Computes the path of the rolled log file given the base file path and the date string.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let trimmed = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", trimmed, date_str, index)
}

/// Walks rolled-file indices until one is under the size limit.
///
/// Returns `file_path` unchanged when it is absent or small enough;
/// otherwise the first successor path whose file is missing or under
/// `max_size`.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut final_path = file_path.to_string();
	let mut index = 1;
	while let Ok(meta) = metadata(&final_path) {
		if meta.len() <= max_size {
			break;
		}
		final_path = compute_rolled_file_path(base_file_path, date_str, index);
		index += 1;
	}
	final_path
}

fn compact_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Sets up logging by reading configuration from environment variables.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let settings = LogSettings::from_env()?;

	let subscriber =
		tracing_subscriber::registry().with(EnvFilter::new(settings.level.to_string()));

	match settings.destination {
		LogDestination::File => {
			let log_dir = format!("{}/", settings.directory.trim_end_matches('/'));
			let date_str = Utc::now().format("%Y-%m-%d").to_string();
			let base_file_path = format!("{}reconciler.log", log_dir);

			// Daily file name first, then roll on size within the day
			let time_based_path = compute_rolled_file_path(&base_file_path, &date_str, 1);
			if let Some(parent) = Path::new(&time_based_path).parent() {
				create_dir_all(parent)?;
			}
			let final_path = space_based_rolling(
				&time_based_path,
				&base_file_path,
				&date_str,
				settings.max_size,
			);

			let file_appender = tracing_appender::rolling::never(
				Path::new(&final_path).parent().unwrap_or(Path::new(".")),
				Path::new(&final_path).file_name().unwrap_or_default(),
			);

			subscriber
				.with(
					fmt::layer()
						.event_format(StripAnsiFormatter::new(compact_format(false)))
						.with_writer(file_appender)
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.init();
			info!("Logging to file: {}", final_path);
		}
		LogDestination::Stdout => {
			subscriber
				.with(
					fmt::layer()
						.event_format(compact_format(true))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.init();
		}
	}

	info!(
		"Logging is successfully configured (destination: {:?}, level: {})",
		settings.destination, settings.level
	);
	Ok(())
}
