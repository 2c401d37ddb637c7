//! List every post in the repository

use anyhow::Result;

use crate::generator::Generator;
use crate::helpers::date::format_pt_br;
use crate::pagination::LoadMoreController;
use crate::Prismo;

/// Walk the CMS pagination to exhaustion and print every post
pub async fn run(prismo: &Prismo) -> Result<()> {
    let client = prismo.client()?;
    let generator = Generator::new(&client, prismo.config.clone(), prismo.public_dir.clone())?;

    let initial = generator.build_post_list().await?;
    let mut controller = LoadMoreController::new(&client, initial);
    controller.load_all().await?;

    let state = controller.into_state();
    println!("Posts ({}):", state.results.len());
    for post in &state.results {
        println!(
            "  {} - {} [{}]",
            format_pt_br(post.first_publication_date.as_deref()),
            post.title,
            post.uid.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
