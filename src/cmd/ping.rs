//! `correlation-id ping` — call `/ping` on a running instance.
//!
//! Sends `GET <url>/ping`, optionally carrying a correlation id, and
//! shows the status, the correlation header the server echoed and the
//! id the handler read from its request context.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;

use crate::cli::PingArgs;
use crate::error::CorrelationIdError;

#[derive(Debug, Serialize)]
pub struct PingReport {
    pub status: u16,
    pub header: String,
    pub echoed: Option<String>,
    pub body: String,
}

impl PingReport {
    /// Whether the echoed header matches what the handler saw.
    #[must_use]
    pub fn consistent(&self) -> bool {
        self.echoed.as_deref().map_or(true, |echoed| echoed == self.body)
    }
}

pub async fn execute(args: PingArgs) -> Result<(), CorrelationIdError> {
    let report = ping(&args).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string(&report).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
        );
    } else if report.status < 400 {
        println!("\u{2713} {} answered {}", args.url, report.status);
        println!(
            "  {}: {}",
            report.header,
            report.echoed.as_deref().unwrap_or("(not echoed)")
        );
        println!("  handler saw:    {}", report.body);
        if !report.consistent() {
            println!("  \u{26a0} echoed header differs from handler context");
        }
    } else {
        eprintln!("\u{2717} {} answered {}", args.url, report.status);
        eprintln!("  {}", report.body.trim_end());
    }

    let status = hyper::StatusCode::from_u16(report.status)
        .unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_success() {
        Ok(())
    } else {
        Err(CorrelationIdError::PingFailed(status))
    }
}

pub async fn ping(args: &PingArgs) -> Result<PingReport, CorrelationIdError> {
    let url = format!("{}/ping", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse().map_err(
            |e: hyper::http::uri::InvalidUri| CorrelationIdError::UriParse {
                source: Box::new(e),
            },
        )?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let mut builder = hyper::Request::builder().uri(uri);
    if let Some(ref id) = args.correlation_id {
        builder = builder.header(args.header_name.as_str(), id.as_str());
    }
    let req = builder
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| CorrelationIdError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| CorrelationIdError::HttpRequest {
            source: "ping timed out after 10s".into(),
        })?
        .map_err(|e| CorrelationIdError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let echoed = response
        .headers()
        .get(args.header_name.as_str())
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| CorrelationIdError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok(PingReport {
        status: status.as_u16(),
        header: args.header_name.clone(),
        echoed,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
