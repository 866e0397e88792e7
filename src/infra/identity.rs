use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::infra::process::run_captured;
use crate::services::{IdentityChain, IdentityResolver};

const FEDORA_CERT_FILE: &str = ".fedora.cert";

/// `--user` wins outright; otherwise the certificate, then a prompt.
pub fn identity_chain(username: Option<&str>) -> IdentityChain {
    let resolvers: Vec<Arc<dyn IdentityResolver>> = match username {
        Some(username) => vec![Arc::new(FixedIdentity::new(username))],
        None => vec![
            Arc::new(CertificateResolver::new()),
            Arc::new(InteractivePromptResolver::stdio()),
        ],
    };
    IdentityChain::new(resolvers)
}

/// Username given on the command line.
pub struct FixedIdentity {
    username: String,
}

impl FixedIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for FixedIdentity {
    fn name(&self) -> &'static str {
        "command line"
    }

    async fn resolve(&self) -> AppResult<String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AppError::Identity("--user must not be empty".to_string()));
        }
        Ok(username.to_string())
    }
}

/// Reads the FAS username from the subject of the Fedora client certificate.
pub struct CertificateResolver {
    cert_path: Option<PathBuf>,
    program: String,
}

impl CertificateResolver {
    pub fn new() -> Self {
        Self {
            cert_path: dirs::home_dir().map(|home| home.join(FEDORA_CERT_FILE)),
            program: "openssl".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_cert_path(mut self, cert_path: PathBuf) -> Self {
        self.cert_path = Some(cert_path);
        self
    }
}

impl Default for CertificateResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for CertificateResolver {
    fn name(&self) -> &'static str {
        "fedora certificate"
    }

    async fn resolve(&self) -> AppResult<String> {
        let cert_path = self
            .cert_path
            .as_ref()
            .ok_or_else(|| AppError::Identity("unable to locate home directory".to_string()))?;
        if !cert_path.exists() {
            return Err(AppError::Identity(format!(
                "{} does not exist",
                cert_path.display()
            )));
        }

        let result = run_captured(
            &self.program,
            [
                OsStr::new("x509"),
                OsStr::new("-noout"),
                OsStr::new("-subject"),
                OsStr::new("-nameopt"),
                OsStr::new("RFC2253"),
                OsStr::new("-in"),
                cert_path.as_os_str(),
            ],
        )
        .await?;
        if !result.success() {
            return Err(AppError::Identity(format!(
                "could not read {}: {}",
                cert_path.display(),
                result.output.trim()
            )));
        }

        subject_common_name(&result.output).ok_or_else(|| {
            AppError::Identity(format!(
                "no common name in certificate subject: {}",
                result.output.trim()
            ))
        })
    }
}

/// Extracts `CN` from `openssl x509 -subject` output, RFC2253 or legacy `/CN=` form.
fn subject_common_name(output: &str) -> Option<String> {
    let subject = output.trim();
    let subject = subject.strip_prefix("subject=").unwrap_or(subject).trim();

    subject
        .split([',', '/'])
        .filter_map(|part| part.split_once('='))
        .find(|(key, _)| key.trim() == "CN")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Asks for the username on the terminal.
pub struct InteractivePromptResolver {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl InteractivePromptResolver {
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn prompt(&self) -> AppResult<String> {
        {
            let mut output = self
                .output
                .lock()
                .map_err(|_| AppError::Identity("prompt output unavailable".to_string()))?;
            write!(output, "FAS username: ")?;
            output.flush()?;
        }

        let mut line = String::new();
        self.input
            .lock()
            .map_err(|_| AppError::Identity("prompt input unavailable".to_string()))?
            .read_line(&mut line)?;

        let username = line.trim();
        if username.is_empty() {
            return Err(AppError::Identity("no FAS username entered".to_string()));
        }
        Ok(username.to_string())
    }
}

#[async_trait]
impl IdentityResolver for InteractivePromptResolver {
    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn resolve(&self) -> AppResult<String> {
        self.prompt()
    }
}
