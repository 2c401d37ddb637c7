//! Clean the public directory

use anyhow::Result;

use crate::generator;
use crate::Prismo;

/// Delete the public directory
pub fn run(prismo: &Prismo) -> Result<()> {
    generator::clean_public_dir(&prismo.public_dir)
}
