//! LSP command implementation

use miette::Result;
use padlint_core::SessionConfig;

use crate::utils::create_tokio_runtime;

pub fn run_lsp(config: SessionConfig) -> Result<()> {
    create_tokio_runtime()?.block_on(async {
        padlint_lsp::run_with_config(config).await;
    });
    Ok(())
}
