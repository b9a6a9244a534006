pub mod directives;
pub mod ffmpeg;
pub mod remux;
pub mod streams;

#[cfg(test)]
pub mod fake;
