//! Which paths need a credential.
use regex::Regex;

/// How the authenticator treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `except` matched: never look at the credential.
    Skip,
    /// `optional` matched: validate a credential if one is sent.
    Optional,
    /// Default.
    Required,
}

/// `except` / `optional` pattern lists. A pattern applies when it matches
/// anywhere in the path, so anchor it (`^/health`) for prefix semantics.
#[derive(Debug, Clone, Default)]
pub struct PathPolicy {
    except: Vec<Regex>,
    optional: Vec<Regex>,
}

impl PathPolicy {
    pub fn new(except: Vec<Regex>, optional: Vec<Regex>) -> Self {
        Self { except, optional }
    }

    pub fn from_patterns<S: AsRef<str>>(
        except: &[S],
        optional: &[S],
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(compile(except)?, compile(optional)?))
    }

    /// `except` wins over `optional`. The path is taken verbatim: no
    /// case folding, slash or trailing-slash normalization.
    pub fn mode(&self, path: &str) -> AuthMode {
        if self.except.iter().any(|p| p.is_match(path)) {
            AuthMode::Skip
        } else if self.optional.iter().any(|p| p.is_match(path)) {
            AuthMode::Optional
        } else {
            AuthMode::Required
        }
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p.as_ref())).collect()
}
