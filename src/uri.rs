use hyper::Uri as HyperUri;
use serde::Serialize;
use url::Url;

use std::borrow::Cow;
use std::ffi::OsStr;

use crate::docker::{ClientType, ClientVersion};
use crate::errors::Error;

#[derive(Debug)]
pub struct Uri<'a> {
    encoded: Cow<'a, str>,
}

impl TryFrom<Uri<'_>> for HyperUri {
    type Error = http::uri::InvalidUri;

    fn try_from(uri: Uri<'_>) -> Result<Self, Self::Error> {
        uri.encoded.as_ref().parse()
    }
}

impl<'a> Uri<'a> {
    pub(crate) fn parse<O, P>(
        socket: P,
        client_type: &ClientType,
        path: &'a str,
        query: Option<O>,
        client_version: &ClientVersion,
    ) -> Result<Self, Error>
    where
        O: Serialize,
        P: AsRef<OsStr>,
    {
        let host_str = format!(
            "{}://{}/v{}.{}{}",
            Uri::socket_scheme(client_type),
            Uri::socket_host(socket, client_type),
            client_version.major_version,
            client_version.minor_version,
            path
        );
        let mut url = Url::parse(host_str.as_ref())?;

        if let Some(pairs) = query {
            let qs = serde_urlencoded::to_string(pairs)?;
            if !qs.is_empty() {
                url.set_query(Some(&qs));
            }
        }

        debug!("Parsed uri: {}", url.as_str());

        Ok(Uri {
            encoded: Cow::Owned(url.as_str().to_owned()),
        })
    }

    fn socket_host<P>(socket: P, client_type: &ClientType) -> String
    where
        P: AsRef<OsStr>,
    {
        match client_type {
            // hyperlocal decodes the socket path back out of a hex-encoded authority
            ClientType::Unix => hex::encode(socket.as_ref().to_string_lossy().as_bytes()),
            #[cfg(test)]
            ClientType::Http => socket.as_ref().to_string_lossy().into_owned(),
        }
    }

    fn socket_scheme(client_type: &ClientType) -> &'a str {
        match client_type {
            ClientType::Unix => "unix",
            #[cfg(test)]
            ClientType::Http => "http",
        }
    }
}
