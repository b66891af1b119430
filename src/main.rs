//! autoslider: drive a character editor's sliders from a target profile.

use anyhow::Result;

fn main() -> Result<()> {
    autoslider::cli::run()
}
