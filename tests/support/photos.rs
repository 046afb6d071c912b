use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tumor_classifier::classify::{ColorMode, ImageConstraint};
use tumor_classifier::ml::{ImageClassifierModel, MODEL_VERSION, ModelInput};

/// Write a solid-color PNG and return its path.
pub fn write_photo(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create photo dir");
    let path = dir.join(name);
    RgbImage::from_pixel(16, 12, Rgb(color))
        .save(&path)
        .expect("write photo");
    path
}

/// 1x1 grayscale model: bright photos lean `glioma`, dark ones `no_tumor`.
pub fn brightness_model() -> ImageClassifierModel {
    ImageClassifierModel {
        model_version: MODEL_VERSION,
        input: ModelInput {
            name: "sequential_5_input".into(),
            constraint: ImageConstraint {
                width: 1,
                height: 1,
                color: ColorMode::Grayscale,
            },
        },
        output_name: "Identity".into(),
        classes: vec!["glioma".into(), "no_tumor".into()],
        weights: vec![2.0, -2.0],
        bias: vec![-1.0, 1.0],
        pixel_scale: 1.0 / 255.0,
        temperature: 1.0,
    }
}

/// Model that spreads confidence evenly over three classes.
pub fn undecided_model() -> ImageClassifierModel {
    ImageClassifierModel {
        classes: vec!["glioma".into(), "meningioma".into(), "pituitary".into()],
        weights: vec![0.0; 3],
        bias: vec![0.0; 3],
        ..brightness_model()
    }
}

pub fn write_model(path: &Path, model: &ImageClassifierModel) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create model dir");
    }
    std::fs::write(path, serde_json::to_vec_pretty(model).expect("serialize model"))
        .expect("write model");
}
