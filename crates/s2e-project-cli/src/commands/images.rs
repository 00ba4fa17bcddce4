//! `s2e-project images` — list the guest images of the environment.

use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use s2e_project_core::{application::ImageService, domain::ImageDescriptor};

use crate::{
    cli::{GlobalArgs, ImagesArgs, ListFormat},
    commands,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// List every image with its guest OS and binary formats.
#[instrument(skip_all)]
pub fn execute(
    args: ImagesArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let environment = commands::environment(&global, &config)?;
    let images = ImageService::new(Box::new(commands::image_catalog(&environment)))
        .list()
        .with_cli_context(|| "listing images")?;

    debug!(count = images.len(), "Images listed");

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => output.json(&images)?,
        ListFormat::List => {
            for image in &images {
                output.print(&image.name)?;
            }
        }
        ListFormat::Table => {
            if images.is_empty() {
                output.warning(&format!(
                    "No images found in {}",
                    environment.images_dir().display()
                ))?;
                return Ok(());
            }
            for line in table(&images, output.supports_color()) {
                output.print(&line)?;
            }
        }
    }

    Ok(())
}

fn formats(image: &ImageDescriptor) -> String {
    image
        .os
        .binary_formats
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `images` as an aligned table with a header row.
fn table(images: &[ImageDescriptor], color: bool) -> Vec<String> {
    let width = images
        .iter()
        .map(|image| image.name.len())
        .max()
        .unwrap_or(0)
        .max("IMAGE".len());

    let header = format!("{:<width$}  {:<8}  {:<8}  FORMATS", "IMAGE", "OS", "ARCH");
    let mut lines = vec![if color {
        header.bold().to_string()
    } else {
        header
    }];

    lines.extend(images.iter().map(|image| {
        format!(
            "{:<width$}  {:<8}  {:<8}  {}",
            image.name,
            image.os.name,
            image.os.arch.as_str(),
            formats(image)
        )
    }));
    lines
}
