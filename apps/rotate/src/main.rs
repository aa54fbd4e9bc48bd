use argh::FromArgs;
use std::path::PathBuf;

use rota::{
    image::{Image, ImageError},
    imgproc::{
        interpolation::InterpolationMode,
        warp::{rotate, CanvasPolicy, RotationSpec},
    },
    io::{read_image_any, write_image_any, GenericImage},
};

/// Rotate an image by an arbitrary angle
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the input image
    #[argh(positional)]
    input_path: PathBuf,

    /// path to the output image, png or jpeg
    #[argh(positional)]
    output_path: PathBuf,

    /// rotation angle in degrees
    #[argh(option, short = 'a', default = "45.0")]
    angle: f64,

    /// canvas policy: grow or fixed
    #[argh(
        option,
        short = 'c',
        default = "CanvasPolicy::GrowToFit",
        from_str_fn(to_canvas_policy)
    )]
    canvas: CanvasPolicy,

    /// interpolation mode: bilinear or nearest
    #[argh(
        option,
        short = 'm',
        default = "InterpolationMode::Bilinear",
        from_str_fn(to_interpolation_mode)
    )]
    interpolation: InterpolationMode,
}

fn to_canvas_policy(value: &str) -> Result<CanvasPolicy, String> {
    value.parse()
}

fn to_interpolation_mode(value: &str) -> Result<InterpolationMode, String> {
    value.parse()
}

/// Everything a single rotation run needs.
#[derive(Debug, Clone, PartialEq)]
struct RotateConfig {
    input_path: PathBuf,
    output_path: PathBuf,
    angle_degrees: f64,
    canvas_policy: CanvasPolicy,
    interpolation: InterpolationMode,
}

impl From<Args> for RotateConfig {
    fn from(args: Args) -> Self {
        Self {
            input_path: args.input_path,
            output_path: args.output_path,
            angle_degrees: args.angle,
            canvas_policy: args.canvas,
            interpolation: args.interpolation,
        }
    }
}

impl RotateConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.angle_degrees.is_finite() {
            return Err(format!("angle must be finite, got {}", self.angle_degrees));
        }
        Ok(())
    }
}

fn rotate_image<const C: usize>(
    image: &Image<u8, C>,
    config: &RotateConfig,
) -> Result<Image<u8, C>, ImageError> {
    rotate(
        image,
        RotationSpec::from_degrees(config.angle_degrees),
        config.canvas_policy,
        config.interpolation,
    )
}

fn run(config: RotateConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let image = read_image_any(&config.input_path)?;
    log::info!(
        "loaded {} ({}, {} channels)",
        config.input_path.display(),
        image.size(),
        image.num_channels()
    );

    let rotated = match &image {
        GenericImage::L8(img) => GenericImage::L8(rotate_image(img, &config)?),
        GenericImage::La8(img) => GenericImage::La8(rotate_image(img, &config)?),
        GenericImage::Rgb8(img) => GenericImage::Rgb8(rotate_image(img, &config)?),
        GenericImage::Rgba8(img) => GenericImage::Rgba8(rotate_image(img, &config)?),
    };
    log::info!(
        "rotated by {} degrees onto a {} canvas ({})",
        config.angle_degrees,
        config.canvas_policy,
        rotated.size()
    );

    write_image_any(&config.output_path, &rotated)?;
    log::info!("wrote {}", config.output_path.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    run(args.into())
}
