use async_trait::async_trait;

/// Minimal lifecycle contract for long-running bridge tasks.
///
/// `start` performs one-time setup, `run` is the (usually endless) main
/// loop, and `stop` releases anything `start` acquired.
#[async_trait]
pub trait Service {
    type Error;

    async fn start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn run(&mut self) -> Result<(), Self::Error>;

    async fn stop(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
