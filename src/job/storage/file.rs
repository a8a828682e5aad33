use std::future::Future;

/// Destination for the generated printer documents.
pub trait Client {
    type Error;
    fn put(
        &self,
        name: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
