use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use texture_decode::{ImageFormat, Surface};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Etc1,
    Astc,
}

#[derive(Parser, Debug)]
#[command(
    name = "texdec",
    about = "Decode raw ETC1 or ASTC texture data without a container header and save it as an image."
)]
struct Args {
    /// Compressed texture data path
    input: PathBuf,

    /// Output image path (format inferred from the extension)
    output: PathBuf,

    /// Texture width in pixels
    #[arg(long, value_name = "PIXELS")]
    width: u32,

    /// Texture height in pixels
    #[arg(long, value_name = "PIXELS")]
    height: u32,

    /// Compressed block format
    #[arg(long, value_enum)]
    format: Format,

    /// ASTC block width and height in pixels (4, 5, 6, 8, 10, or 12)
    #[arg(long, value_name = "PIXELS", default_value_t = 4)]
    block_size: u32,

    /// Skip this many bytes at the start of the input files
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    offset: usize,

    /// Keep the decoded row order instead of flipping to top to bottom
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_flip: bool,

    /// Compressed texture whose red channel replaces the output alpha
    #[arg(long, value_name = "PATH")]
    alpha: Option<PathBuf>,

    /// Alpha texture width in pixels (defaults to --width)
    #[arg(long, value_name = "PIXELS", requires = "alpha")]
    alpha_width: Option<u32>,

    /// Alpha texture height in pixels (defaults to --height)
    #[arg(long, value_name = "PIXELS", requires = "alpha")]
    alpha_height: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let input = read_file(&args.input)?;
    let alpha = args.alpha.as_deref().map(read_file).transpose()?;

    let start = Instant::now();
    let image = convert(&args, &input, alpha.as_deref())?;
    info!(elapsed = ?start.elapsed(), "decoded {}", args.input.display());

    image
        .save(&args.output)
        .with_context(|| format!("save output {}", args.output.display()))?;

    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read input {}", path.display()))
}

/// Decodes the color texture and optional alpha texture into the final image.
fn convert(args: &Args, input: &[u8], alpha: Option<&[u8]>) -> Result<image::RgbaImage> {
    let image_format = match args.format {
        Format::Etc1 => ImageFormat::Etc1RgbUnorm,
        Format::Astc => ImageFormat::astc(args.block_size)
            .with_context(|| format!("unsupported ASTC block size {}", args.block_size))?,
    };

    let mut image = decode_image(input, args.width, args.height, image_format, args.offset)
        .with_context(|| format!("decode {}", args.input.display()))?;

    if let Some(alpha) = alpha {
        let alpha = decode_image(
            alpha,
            args.alpha_width.unwrap_or(args.width),
            args.alpha_height.unwrap_or(args.height),
            image_format,
            args.offset,
        )
        .context("decode alpha texture")?;
        texture_decode::merge_alpha(&mut image, &alpha);
    }

    // Textures are stored with the bottom row first.
    if !args.no_flip {
        image::imageops::flip_vertical_in_place(&mut image);
    }

    Ok(image)
}

fn decode_image(
    bytes: &[u8],
    width: u32,
    height: u32,
    image_format: ImageFormat,
    offset: usize,
) -> Result<image::RgbaImage> {
    let data = bytes.get(offset..).with_context(|| {
        format!(
            "offset {offset} is past the end of the data ({} bytes)",
            bytes.len()
        )
    })?;

    let surface = Surface {
        width,
        height,
        image_format,
        data,
    };
    texture_decode::image_from_surface(&surface)
        .with_context(|| format!("decode {image_format:?} data"))
}
