//! External ffmpeg muxing.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Check that ffmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Argument list for merging one audio and one video stream: x264 at a
/// constant quality target, AAC at a fixed bitrate, faststart layout so
/// playback can begin before the file finishes transferring.
fn build_merge_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        video.to_string_lossy().into_owned(),
        "-i".into(),
        audio.to_string_lossy().into_owned(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "medium".into(),
        "-crf".into(),
        "23".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "128k".into(),
        "-movflags".into(),
        "+faststart".into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Merge downloaded audio and video streams into the final output.
pub async fn merge_streams(video: &Path, audio: &Path, output: &Path) -> MediaResult<()> {
    check_ffmpeg()?;

    let args = build_merge_args(video, audio, output);
    debug!("running ffmpeg {}", args.join(" "));

    let result = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let message = stderr.lines().last().unwrap_or("unknown error").to_string();
        return Err(MediaError::ffmpeg_failed(
            message,
            Some(stderr.into_owned()),
            result.status.code(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_args_layout() {
        let args = build_merge_args(
            Path::new("/d/t_temp.mp4"),
            Path::new("/d/t_temp.mp3"),
            Path::new("/d/t.mp4"),
        );

        // Video input precedes audio input
        let first_input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[first_input + 1], "/d/t_temp.mp4");

        for expected in [
            "libx264", "medium", "23", "aac", "128k", "+faststart", "-y",
        ] {
            assert!(args.iter().any(|a| a == expected), "missing {expected}");
        }
        assert_eq!(args.last().map(String::as_str), Some("/d/t.mp4"));
    }
}
