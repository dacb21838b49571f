use ripl::error::Error;
use ripl::http::{self, Fetch};
use ripl::view::Templates;
use std::path::PathBuf;
use tokio::fs::read_to_string;

use crate::logging::ok;

pub type Cache = Templates<Box<dyn Fetch>>;

pub async fn render(
    templates: &Cache,
    id: &str,
    context: Option<String>,
    context_file: Option<PathBuf>,
) -> Result<(), Error> {
    let context = match (context, context_file) {
        (Some(context), _) => context,
        (None, Some(path)) => read_to_string(path).await?,
        (None, None) => "{}".to_string(),
    };

    let context: serde_json::Value = serde_json::from_str(&context)?;
    let template = templates.get(id).await?;

    log::info!("Rendering \"{}\"", template.name());

    println!("{}", template.render(context)?);

    Ok(())
}

/// Fetch and compile every template, reporting each failure.
/// Returns false if any of them failed.
pub async fn check(templates: &Cache, ids: &[String]) -> bool {
    let mut failed = 0;

    for id in ids {
        match templates.get(id).await {
            Ok(_) => ok(id),
            Err(err) => {
                crate::logging::error(err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        log::error!("{} of {} templates failed", failed, ids.len());
    }

    failed == 0
}

pub fn url(templates: &Cache, id: &str) -> Result<(), Error> {
    let path = templates.url(id)?;

    let url = match ripl::config::get_config().transport.origin {
        Some(ref origin) => origin
            .join(&path)
            .map_err(http::Error::from)?
            .to_string(),
        None => path,
    };

    println!("{}", url);

    Ok(())
}
