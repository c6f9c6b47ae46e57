// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Still and clip capture through external commands, with optional upload.
//!
//! Capture commands are run with `sh -c` after `{output}` is replaced by the
//! quoted target path. Uploads are a bearer-authenticated HTTP PUT of the file
//! to `{upload_url}/{file_name}`. A capture is deleted locally once it has
//! been uploaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use butler_config::model::CameraConfig;
use butler_core::ButlerError;
use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

/// What to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Still,
    Clip,
}

impl CaptureKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Still => "still",
            Self::Clip => "clip",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Still => "jpg",
            Self::Clip => "h264",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Still => "image/jpeg",
            Self::Clip => "video/h264",
        }
    }
}

struct Uploader {
    client: reqwest::Client,
    url: String,
    token: Option<SecretString>,
}

/// Camera driven by shell commands.
pub struct Camera {
    enabled: bool,
    still_command: String,
    clip_command: String,
    output_dir: PathBuf,
    timeout: Duration,
    uploader: Option<Uploader>,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Result<Self, ButlerError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let uploader = match &config.upload_url {
            Some(url) if !url.is_empty() => {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| ButlerError::Actuator {
                        message: format!("failed to build upload client: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                Some(Uploader {
                    client,
                    url: url.trim_end_matches('/').to_string(),
                    token: config.upload_token.clone().map(SecretString::from),
                })
            }
            _ => None,
        };

        Ok(Self {
            enabled: config.enabled,
            still_command: config.still_command.clone(),
            clip_command: config.clip_command.clone(),
            output_dir: PathBuf::from(&config.output_dir),
            timeout,
            uploader,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run the capture command for `kind` and return the written file.
    pub async fn capture(&self, kind: CaptureKind) -> Result<PathBuf, ButlerError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ButlerError::Actuator {
                message: format!("cannot create {}: {e}", self.output_dir.display()),
                source: Some(Box::new(e)),
            })?;

        let file_name = format!(
            "{}-{}.{}",
            kind.prefix(),
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ"),
            kind.extension()
        );
        let path = self.output_dir.join(file_name);
        let template = match kind {
            CaptureKind::Still => &self.still_command,
            CaptureKind::Clip => &self.clip_command,
        };
        let command = template.replace("{output}", &shell_quote(&path.to_string_lossy()));
        debug!(%command, "running capture command");

        let child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| ButlerError::Timeout {
                duration: self.timeout,
            })?
            .map_err(|e| ButlerError::Actuator {
                message: format!("failed to run capture command: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(ButlerError::Actuator {
                message: format!(
                    "capture command exited with {exit_code}: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                source: None,
            });
        }
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ButlerError::Actuator {
                message: format!("capture command did not write {}", path.display()),
                source: None,
            });
        }

        info!(kind = kind.prefix(), path = %path.display(), "capture written");
        Ok(path)
    }

    /// Upload a capture and remove the local copy. Returns the remote URL,
    /// or `None` when no upload endpoint is configured and the file stays.
    pub async fn upload(&self, path: &Path, kind: CaptureKind) -> Result<Option<String>, ButlerError> {
        let Some(uploader) = &self.uploader else {
            debug!(path = %path.display(), "no upload_url configured; keeping capture local");
            return Ok(None);
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ButlerError::Internal(format!("{} has no file name", path.display())))?;
        let bytes = tokio::fs::read(path).await.map_err(|e| ButlerError::Actuator {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        let url = format!("{}/{file_name}", uploader.url);
        let mut request = uploader
            .client
            .put(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static(kind.content_type()))
            .body(bytes);
        if let Some(token) = &uploader.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| ButlerError::Actuator {
            message: format!("upload failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ButlerError::Actuator {
                message: format!("upload returned {status}: {body}"),
                source: None,
            });
        }

        info!(%url, "capture uploaded");
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "failed to remove uploaded capture");
        }
        Ok(Some(url))
    }
}

fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}
