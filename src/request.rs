//! Incoming HTTP request type.

use crate::method::Method;

/// An incoming HTTP request.
///
/// Headers and body are carried as-is; lane does not interpret them. Path
/// parameters are not part of the request — the router binds them during
/// dispatch and hands them to [`ParamHandler`](crate::ParamHandler)s as a
/// separate [`Params`](crate::Params) argument. A handler reached through a
/// middleware chain has the plain signature instead; see
/// [`with_params`](crate::with_params) when such a handler needs them anyway.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        Self { method, path, headers, body }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
