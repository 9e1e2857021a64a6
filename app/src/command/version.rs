/// Prints the agora version.
#[derive(Debug, Clone, Copy)]
pub struct VersionStrategy;

impl super::CommandStrategy for VersionStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        println!("agora {}", env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
