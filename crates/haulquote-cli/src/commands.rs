//! Command implementations

use crate::cli::{Cli, Commands};
use crate::output::{output_estimate, output_quote};
use base64::Engine;
use haulquote_app::app::{service_from_config, EndpointResponse};
use haulquote_app::config::Config;
use haulquote_app::proxy::UpstreamProxy;
use haulquote_domain::{ceil_to_tenth, derive_quote};
use haulquote_types::{
    ConfigError, Error, EstimateRequest, ImageInput, OutputFormat, RequestError, Result,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref model) = cli.primary_model {
        config.primary_model = model.clone();
    }
    if let Some(ref model) = cli.secondary_model {
        config.secondary_model = model.clone();
    }

    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Estimate {
            images,
            request,
            remote,
        } => cmd_estimate(&config, images, request, remote, output_format).await,

        Commands::Quote { volume } => cmd_quote(volume, output_format),

        Commands::Config {
            show,
            set_primary_model,
            set_secondary_model,
            set_api_key_env,
            set_base_url,
            set_proxy_upstream,
            set_output,
            reset,
        } => cmd_config(
            show,
            set_primary_model,
            set_secondary_model,
            set_api_key_env,
            set_base_url,
            set_proxy_upstream,
            set_output,
            reset,
        ),
    }
}

async fn cmd_estimate(
    config: &Config,
    images: Vec<PathBuf>,
    request: Option<PathBuf>,
    remote: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let body = match request {
        Some(path) => read_request_body(&path)?,
        None => serde_json::to_value(build_request(&images)?)?,
    };

    let response = match remote {
        Some(url) => {
            let url = if url.is_empty() {
                config
                    .proxy_upstream
                    .clone()
                    .ok_or(ConfigError::MissingSetting("proxy_upstream"))?
            } else {
                url
            };

            let proxy = UpstreamProxy::new(url, config.proxy_deadline())?;
            let proxied = proxy.forward(&body).await?;
            info!(
                url = %proxy.url(),
                status = proxied.status_code,
                attempts = proxied.attempts,
                "Remote estimate finished"
            );
            EndpointResponse {
                status_code: proxied.status_code,
                body: proxied.body,
            }
        }
        None => {
            let service = service_from_config(config);
            let raw = serde_json::to_vec(&body)?;
            service.handle(&raw).await
        }
    };

    output_estimate(output_format, &response)
}

fn cmd_quote(volume: f64, output_format: OutputFormat) -> Result<()> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(Error::Request(RequestError::MalformedBody(format!(
            "volume must be a non-negative number, got {}",
            volume
        ))));
    }

    output_quote(output_format, &derive_quote(ceil_to_tenth(volume)))
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_primary_model: Option<String>,
    set_secondary_model: Option<String>,
    set_api_key_env: Option<String>,
    set_base_url: Option<String>,
    set_proxy_upstream: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(model) = set_primary_model {
        config.primary_model = model;
        modified = true;
    }

    if let Some(model) = set_secondary_model {
        config.secondary_model = model;
        modified = true;
    }

    if let Some(env) = set_api_key_env {
        config.api_key_env = env;
        modified = true;
    }

    if let Some(url) = set_base_url {
        config.base_url = Some(url);
        modified = true;
    }

    if let Some(url) = set_proxy_upstream {
        config.proxy_upstream = Some(url);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn read_request_body(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Inline every image file as base64, with a MIME type guessed from the extension.
fn build_request(images: &[PathBuf]) -> Result<EstimateRequest> {
    let mut inputs = Vec::with_capacity(images.len());

    for path in images {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        inputs.push(ImageInput::Inline {
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
            mime_type: mime_from_extension(path).map(str::to_string),
        });
    }

    Ok(EstimateRequest { images: inputs })
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("pile.JPG")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("pile.png")), Some("image/png"));
        assert_eq!(mime_from_extension(Path::new("pile.txt")), None);
        assert_eq!(mime_from_extension(Path::new("pile")), None);
    }

    #[test]
    fn test_missing_image_is_file_not_found() {
        let result = build_request(&[PathBuf::from("/nonexistent/pile.jpg")]);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_no_images_builds_empty_request() {
        let request = build_request(&[]).unwrap();
        assert!(request.images.is_empty());
    }

    #[test]
    fn test_negative_volume_rejected() {
        assert!(cmd_quote(-1.0, OutputFormat::Json).is_err());
        assert!(cmd_quote(f64::NAN, OutputFormat::Json).is_err());
    }
}
