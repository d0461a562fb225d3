/// A fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct Response {
    pub status: u16,
    pub body:   Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// Blocking HTTP client abstraction.
///
/// Implementations follow redirects themselves and only report transport
/// failures as errors; non-2xx statuses come back as a [`Response`].
pub trait HttpClient {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Response, Self::Error>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    type Error = C::Error;

    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Response, Self::Error> {
        (**self).get(url, headers)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::{HttpClient, Response};

    /// Production HTTP client built on `reqwest::blocking`.
    pub struct ReqwestClient {
        client: reqwest::blocking::Client,
    }

    impl ReqwestClient {
        pub fn new(timeout: Duration) -> reqwest::Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("solvpack/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Response, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send()?;
            let status = response.status().as_u16();
            let body = response.bytes()?.to_vec();
            Ok(Response { status, body })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
