//! ffmpeg transcoding for media above the upload budget

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::StorageError;

/// Longest edge kept when shrinking video
const MAX_WIDTH: u32 = 1280;

/// x264 quality; higher is smaller
const CRF: u32 = 30;

/// Shrinks media with an external `ffmpeg` binary
#[derive(Debug, Clone)]
pub struct Transcoder {
    ffmpeg: PathBuf,
}

impl Transcoder {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Re-encode `input` as a smaller H.264/AAC MP4 next to it
    ///
    /// The whole clip is encoded; the caller checks the result against its
    /// budget. Returns the output path.
    #[instrument(skip(self))]
    pub async fn shrink_video(&self, input: &Path) -> Result<PathBuf, StorageError> {
        let output = output_path(input);
        let args = shrink_args(input, &output);

        debug!(ffmpeg = %self.ffmpeg.display(), "running ffmpeg");
        let result = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| StorageError::Transcode(format!("failed to run ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let last_line = stderr.trim().lines().last().unwrap_or("no output");
            return Err(StorageError::Transcode(format!(
                "ffmpeg exited with {}: {last_line}",
                result.status
            )));
        }

        let written = tokio::fs::metadata(&output).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(StorageError::Transcode("ffmpeg produced no output".to_string()));
        }
        Ok(output)
    }
}

/// `clip.webm` → `clip.small.mp4` in the same directory
fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("media");
    input.with_file_name(format!("{stem}.small.mp4"))
}

fn shrink_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-hide_banner".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        "-vf".into(),
        format!("scale='min({MAX_WIDTH},iw)':-2").into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "veryfast".into(),
        "-crf".into(),
        CRF.to_string().into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "96k".into(),
        "-movflags".into(),
        "+faststart".into(),
        output.as_os_str().to_owned(),
    ]
}
