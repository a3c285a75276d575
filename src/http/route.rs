//! API routes.
//!
//! A [`Route`] is an HTTP method plus a path template relative to the API
//! base URL, e.g. `users/{user_id}/profile`. Placeholders are filled per
//! path segment, so values are percent-encoded rather than spliced into
//! the URL verbatim.

use reqwest::{Method, Url};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TatsuError};

/// An HTTP method and path template for one API endpoint.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: &'static str,
    params: HashMap<&'static str, String>,
}

impl Route {
    /// Creates a route for the given method and path template.
    pub fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            params: HashMap::new(),
        }
    }

    /// Creates a GET route.
    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a PATCH route.
    pub fn patch(path: &'static str) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Sets the value substituted for `{name}` in the path template.
    pub fn param(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.params.insert(name, value.to_string());
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolves the route against a base URL.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TatsuError::config(format!("Base URL cannot have a path: {}", base))
            })?;
            segments.pop_if_empty();

            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(name) => {
                        let value = self.params.get(name).ok_or_else(|| {
                            TatsuError::invalid_argument(format!(
                                "Missing value for '{{{}}}' in route {}",
                                name, self.path
                            ))
                        })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
