mod common;

use common::synthetic::{BACKGROUND, disc_image, disc_labels};
use image::{DynamicImage, Rgba, RgbaImage};
use mask_refine::processors::{close_labels, foreground_mask, skeletonize};
use mask_refine::utils::mask_to_labels;
use mask_refine::{
    LabelGrid, MaskRefiner, PointPrompt, PromptModelConfig, PromptModelRegistry,
    PromptModelVariant, PromptSegmenter, Prompts, RefineConfig, RefineError, apply_dense_crf,
};
use ndarray::{Array2, s};

fn refiner() -> MaskRefiner {
    MaskRefiner::new(RefineConfig::default()).unwrap()
}

#[test]
fn gated_sizes_return_zero_masks() {
    for (w, h) in [(49, 200), (200, 49), (1001, 60), (60, 1001), (10, 10)] {
        let image = DynamicImage::ImageRgb8(disc_image(w, h, 5.0));
        let coarse = LabelGrid::ones((h as usize, w as usize));
        let mask = refiner().refine(&image, coarse.view()).unwrap();
        assert_eq!(mask.dim(), (h as usize, w as usize));
        assert!(mask.iter().all(|&l| l == 0), "{w}x{h} was not gated");
    }
}

#[test]
fn minimum_size_keeps_shape_and_label_range() {
    let image = DynamicImage::ImageRgb8(disc_image(50, 50, 12.0));
    let mut coarse = disc_labels(50, 50, 12.0, 2.0, 1);
    coarse.slice_mut(s![2..8, 2..8]).fill(2);

    let mask = refiner().refine(&image, coarse.view()).unwrap();
    assert_eq!(mask.dim(), (50, 50));
    assert!(mask.iter().all(|&l| l <= 2));
    assert_eq!(mask[[25, 25]], 1);
    assert_eq!(mask[[49, 49]], 0);
}

#[test]
fn refinement_is_deterministic() {
    let image = DynamicImage::ImageRgb8(disc_image(80, 64, 20.0));
    let coarse = disc_labels(80, 64, 18.0, 4.0, 1);
    let first = refiner().refine(&image, coarse.view()).unwrap();
    let second = refiner().refine(&image, coarse.view()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_label_grid_survives_inference() {
    let image = disc_image(64, 64, 20.0);
    for label in [0u32, 3] {
        let coarse = LabelGrid::from_elem((64, 64), label);
        let out = apply_dense_crf(&image, coarse.view(), &RefineConfig::default()).unwrap();
        assert_eq!(out, coarse);
    }
}

#[test]
fn skeleton_of_thin_structure_is_kept() {
    // A one-pixel stalk labeled foreground over background-colored pixels:
    // the dense field alone would erase it.
    let image = image::RgbImage::from_pixel(64, 64, BACKGROUND);
    let mut coarse = LabelGrid::zeros((64, 64));
    coarse.slice_mut(s![8..56, 32]).fill(1);

    let crf_only = apply_dense_crf(&image, coarse.view(), &RefineConfig::default()).unwrap();
    assert!(crf_only.iter().all(|&l| l == 0));

    let mask = refiner()
        .refine(&DynamicImage::ImageRgb8(image), coarse.view())
        .unwrap();
    for y in 8..56 {
        assert_eq!(mask[[y, 32]], 1, "stalk pixel at row {y} lost");
    }
}

#[test]
fn two_wide_diagonal_stalk_is_kept() {
    let image = image::RgbImage::from_pixel(64, 64, BACKGROUND);
    let coarse = LabelGrid::from_shape_fn((64, 64), |(y, x)| {
        u32::from((8..56).contains(&y) && (x == y || x == y + 1))
    });

    let skeleton = skeletonize(&foreground_mask(coarse.view()));
    let kept = skeleton.iter().filter(|&&v| v).count();
    assert!(kept >= 40, "skeleton of the stalk has {kept} pixels");

    let mask = refiner()
        .refine(&DynamicImage::ImageRgb8(image), coarse.view())
        .unwrap();
    ndarray::Zip::indexed(&skeleton).for_each(|(y, x), &on_skeleton| {
        if on_skeleton {
            assert_eq!(mask[[y, x]], 1, "stalk pixel at ({y}, {x}) lost");
        }
    });
    // Both ends of the stalk are still labeled.
    assert!((8..10).any(|y| mask[[y, y]] == 1 || mask[[y, y + 1]] == 1));
    assert!((54..56).any(|y| mask[[y, y]] == 1 || mask[[y, y + 1]] == 1));
}

#[test]
fn refinement_is_independent_of_thread_count() {
    let image = disc_image(96, 80, 24.0);
    let mut coarse = disc_labels(96, 80, 22.0, 5.0, 1);
    coarse.slice_mut(s![4..20, 70..90]).fill(2);
    let dynamic = DynamicImage::ImageRgb8(image.clone());

    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| {
            let crf = apply_dense_crf(&image, coarse.view(), &RefineConfig::default()).unwrap();
            let refined = refiner().refine(&dynamic, coarse.view()).unwrap();
            (crf, refined)
        })
    };

    let (crf_single, refined_single) = run(1);
    let (crf_multi, refined_multi) = run(4);
    assert_eq!(crf_single, crf_multi);
    assert_eq!(refined_single, refined_multi);
}

#[test]
fn output_is_closed() {
    let image = DynamicImage::ImageRgb8(disc_image(72, 60, 18.0));
    let mut coarse = disc_labels(72, 60, 18.0, -3.0, 1);
    coarse.slice_mut(s![10..50, 5]).fill(1);

    let mask = refiner().refine(&image, coarse.view()).unwrap();
    assert_eq!(close_labels(&mask), mask);
}

#[test]
fn disabled_crf_returns_coarse_exactly() {
    let image = DynamicImage::ImageRgb8(disc_image(90, 70, 25.0));
    let coarse = LabelGrid::from_shape_fn((70, 90), |(y, x)| ((x / 9 + y / 7) % 3) as u32);
    let mask = refiner().refine_with(&image, coarse.view(), false).unwrap();
    assert_eq!(mask, coarse);
}

#[test]
fn opaque_rgba_matches_rgb() {
    let rgb = disc_image(66, 58, 17.0);
    let rgba = RgbaImage::from_fn(66, 58, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Rgba([r, g, b, 200])
    });
    let coarse = disc_labels(66, 58, 15.0, 3.0, 1);

    let from_rgb = refiner()
        .refine(&DynamicImage::ImageRgb8(rgb), coarse.view())
        .unwrap();
    let from_rgba = refiner()
        .refine(&DynamicImage::ImageRgba8(rgba), coarse.view())
        .unwrap();
    assert_eq!(from_rgb, from_rgba);
}

#[test]
fn mismatched_labels_are_rejected() {
    let image = DynamicImage::ImageRgb8(disc_image(60, 60, 10.0));
    let coarse = LabelGrid::zeros((59, 60));
    let err = refiner().refine(&image, coarse.view()).unwrap_err();
    assert!(matches!(err, RefineError::ShapeMismatch { .. }), "{err}");
}

#[derive(Debug, Default)]
struct BoxSegmenter {
    size: Option<(u32, u32)>,
}

impl PromptSegmenter for BoxSegmenter {
    fn name(&self) -> &str {
        "box"
    }

    fn set_image(&mut self, image: &image::RgbImage) -> Result<(), mask_refine::core::BoxError> {
        self.size = Some(image.dimensions());
        Ok(())
    }

    fn predict(&self, prompts: &Prompts) -> Result<Array2<bool>, mask_refine::core::BoxError> {
        let (w, h) = self.size.ok_or("image not set")?;
        let bbox = prompts.bbox.ok_or("box prompt required")?;
        Ok(Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            let (x, y) = (x as f32, y as f32);
            x >= bbox.x_min && x < bbox.x_max && y >= bbox.y_min && y < bbox.y_max
        }))
    }
}

#[test]
fn interactive_mask_feeds_refiner() {
    let registry = PromptModelRegistry::new().register(PromptModelVariant::VitB, |_| {
        Ok(Box::new(BoxSegmenter::default()) as Box<dyn PromptSegmenter>)
    });
    let config = PromptModelConfig::new("vit_b".parse().unwrap(), "sam_vit_b.pth");
    let mut session = registry.open_session(&config).unwrap();

    let image = DynamicImage::ImageRgb8(disc_image(64, 64, 16.0));
    session.set_image(&image).unwrap();
    let prompts = Prompts::new()
        .with_point(PointPrompt::foreground(32.0, 32.0))
        .with_box(mask_refine::BoxPrompt::new(16.0, 16.0, 48.0, 48.0));
    let object = session.predict(&prompts).unwrap();

    let coarse = mask_to_labels(&object);
    let mask = refiner().refine(&image, coarse.view()).unwrap();
    assert_eq!(mask[[32, 32]], 1);
    assert_eq!(mask[[2, 2]], 0);
}
