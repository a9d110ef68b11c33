use anyhow::Result;
use quiver_cli::app;

fn main() -> Result<()> {
    app::run()
}
