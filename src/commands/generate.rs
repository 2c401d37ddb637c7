//! Generate static files from the CMS

use anyhow::Result;

use crate::generator::Generator;
use crate::Prismo;

/// Build the index page and every known post page
pub async fn run(prismo: &Prismo) -> Result<()> {
    let start = std::time::Instant::now();

    let client = prismo.client()?;
    let generator = Generator::new(&client, prismo.config.clone(), prismo.public_dir.clone())?;
    generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
