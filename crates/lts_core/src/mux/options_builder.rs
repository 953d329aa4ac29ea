//! ffmpeg remux command options builder.
//!
//! Builds command-line tokens for ffmpeg that copy the original video and
//! audio streams untouched and append the synthesized track as
//! uncompressed little-endian PCM.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

/// Builder for the ffmpeg remux argument list.
pub struct FfmpegOptionsBuilder<'a> {
    video_path: &'a Path,
    audio_path: &'a Path,
    output_path: &'a Path,
    start_timestamp: &'a DateTime<Utc>,
    /// Number of audio streams already in the input; the appended track
    /// lands at this output index.
    existing_audio_streams: usize,
}

impl<'a> FfmpegOptionsBuilder<'a> {
    pub fn new(
        video_path: &'a Path,
        audio_path: &'a Path,
        output_path: &'a Path,
        start_timestamp: &'a DateTime<Utc>,
        existing_audio_streams: usize,
    ) -> Self {
        Self {
            video_path,
            audio_path,
            output_path,
            start_timestamp,
            existing_audio_streams,
        }
    }

    /// Build the complete ffmpeg token list.
    pub fn build(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();

        tokens.push("-hide_banner".to_string());
        tokens.push("-loglevel".to_string());
        tokens.push("error".to_string());
        tokens.push("-nostats".to_string());

        // Inputs: 0 = original clip, 1 = synthesized WAV.
        tokens.push("-i".to_string());
        tokens.push(self.video_path.to_string_lossy().to_string());
        tokens.push("-i".to_string());
        tokens.push(self.audio_path.to_string_lossy().to_string());

        // Video stream 0, all pre-existing audio, then the new track.
        tokens.push("-map".to_string());
        tokens.push("0:v:0".to_string());
        tokens.push("-map".to_string());
        tokens.push("0:a?".to_string());
        tokens.push("-map".to_string());
        tokens.push("1:a:0".to_string());

        // Stream-copy everything, then override the appended track to PCM.
        tokens.push("-c:v".to_string());
        tokens.push("copy".to_string());
        tokens.push("-c:a".to_string());
        tokens.push("copy".to_string());
        tokens.push(format!("-c:a:{}", self.existing_audio_streams));
        tokens.push("pcm_s16le".to_string());

        // Truncate to the shortest stream.
        tokens.push("-shortest".to_string());

        tokens.push("-metadata".to_string());
        tokens.push(format!(
            "creation_time={}",
            self.start_timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        ));

        // Overwrite the destination unconditionally.
        tokens.push("-y".to_string());
        tokens.push(self.output_path.to_string_lossy().to_string());

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build(existing_audio: usize) -> Vec<String> {
        let ts = Utc
            .with_ymd_and_hms(2025, 6, 18, 9, 15, 41)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(679))
            .unwrap();
        FfmpegOptionsBuilder::new(
            Path::new("/in/clip.mp4"),
            Path::new("/work/clip_ltc.wav"),
            Path::new("/out/clip_LTC.mp4"),
            &ts,
            existing_audio,
        )
        .build()
    }

    #[test]
    fn maps_video_existing_audio_and_new_track() {
        let tokens = build(1);
        let joined = tokens.join(" ");
        assert!(joined.contains("-map 0:v:0"));
        assert!(joined.contains("-map 0:a?"));
        assert!(joined.contains("-map 1:a:0"));
    }

    #[test]
    fn copies_streams_and_encodes_appended_track_as_pcm() {
        let tokens = build(1);
        let joined = tokens.join(" ");
        assert!(joined.contains("-c:v copy"));
        assert!(joined.contains("-c:a copy"));
        assert!(joined.contains("-c:a:1 pcm_s16le"));
    }

    #[test]
    fn pcm_index_follows_existing_audio_count() {
        assert!(build(0).join(" ").contains("-c:a:0 pcm_s16le"));
        assert!(build(3).join(" ").contains("-c:a:3 pcm_s16le"));
    }

    #[test]
    fn sets_millisecond_utc_creation_time() {
        let tokens = build(1);
        assert!(tokens
            .iter()
            .any(|t| t == "creation_time=2025-06-18T09:15:41.679Z"));
    }

    #[test]
    fn truncates_to_shortest_and_overwrites() {
        let tokens = build(1);
        assert!(tokens.contains(&"-shortest".to_string()));
        assert!(tokens.contains(&"-y".to_string()));
        // Output path is the final token.
        assert_eq!(tokens.last().unwrap(), "/out/clip_LTC.mp4");
    }

    #[test]
    fn inputs_are_ordered_clip_then_wav() {
        let tokens = build(1);
        let first_i = tokens.iter().position(|t| t == "-i").unwrap();
        assert_eq!(tokens[first_i + 1], "/in/clip.mp4");
        let second_i = tokens[first_i + 2..]
            .iter()
            .position(|t| t == "-i")
            .unwrap()
            + first_i
            + 2;
        assert_eq!(tokens[second_i + 1], "/work/clip_ltc.wav");
    }
}
