//! Slug preview command.

use crate::payload;
use anyhow::Result;
use parawiki_core::generate_slug;

/// Print the slug the editor would generate for a title
pub fn show_slug(title: &str, json: bool) -> Result<()> {
    let slug = generate_slug(title);

    if json {
        let payload = payload::envelope(
            "slug",
            payload::SlugData {
                title: title.to_string(),
                slug,
            },
        );
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{slug}");
    }

    Ok(())
}
