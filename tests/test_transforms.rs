extern crate seq_loader;

use ndarray::{Array3, s};
use seq_loader::pipeline::image_ops;

fn ramp_stack(h: usize, w: usize, c: usize) -> Array3<f32> {
    Array3::from_shape_fn((h, w, c), |(y, x, ch)| (y * w * c + x * c + ch) as f32 / 1000.0)
}

#[test]
fn unpack_splits_wide_sequence_into_channel_stack() {
    let (h, w, seq) = (4, 6, 3);
    let wide = ramp_stack(h, w * seq, 3);

    let stack = image_ops::unpack_image_seq(&wide, w, seq).unwrap();
    assert_eq!(stack.dim(), (h, w, 3 * seq));

    // Frame i of the stack must equal columns i*W..(i+1)*W of the input
    for i in 0..seq {
        let frame = stack.slice(s![.., .., 3 * i..3 * (i + 1)]);
        let source = wide.slice(s![.., i * w..(i + 1) * w, ..]);
        assert_eq!(frame, source);
    }
}

#[test]
fn unpack_rejects_inexact_widths() {
    let wide = ramp_stack(4, 17, 3);
    assert!(image_ops::unpack_image_seq(&wide, 6, 3).is_err());
}

#[test]
fn flipping_twice_returns_the_original() {
    let stack = ramp_stack(5, 7, 9);
    let twice = image_ops::flip_stack(&image_ops::flip_stack(&stack));
    assert_eq!(stack, twice);
}

#[test]
fn flip_mirrors_columns() {
    let stack = ramp_stack(2, 4, 3);
    let flipped = image_ops::flip_stack(&stack);
    for y in 0..2 {
        for x in 0..4 {
            for ch in 0..3 {
                assert_eq!(flipped[[y, x, ch]], stack[[y, 3 - x, ch]]);
            }
        }
    }
}

#[test]
fn crop_output_matches_requested_window() {
    let stack = ramp_stack(10, 12, 9);
    let cropped = image_ops::crop_stack(&stack, 2, 3, 6, 7).unwrap();
    assert_eq!(cropped.dim(), (6, 7, 9));
    assert_eq!(cropped[[0, 0, 0]], stack[[2, 3, 0]]);
    assert_eq!(cropped[[5, 6, 8]], stack[[7, 9, 8]]);
}

#[test]
fn crop_rejects_out_of_bounds_windows() {
    let stack = ramp_stack(10, 12, 3);
    assert!(image_ops::crop_stack(&stack, 5, 0, 6, 12).is_err());
}

#[test]
fn resize_preserves_constant_stacks() {
    let stack = Array3::from_elem((8, 10, 9), 0.25f32);
    let up = image_ops::resize_bilinear(&stack, 11, 14);
    assert_eq!(up.dim(), (11, 14, 9));
    for v in up.iter() {
        assert!((v - 0.25).abs() < 1e-6);
    }

    let labels = Array3::from_elem((8, 10, 9), 7u8);
    let up = image_ops::resize_nearest(&labels, 11, 14);
    assert!(up.iter().all(|&v| v == 7));
}

#[test]
fn nearest_resize_never_invents_labels() {
    // Two-label mask: upscaling must only ever produce those two values
    let mut labels = Array3::from_elem((6, 6, 3), 1u8);
    labels.slice_mut(s![..3, .., ..]).fill(5);

    let up = image_ops::resize_nearest(&labels, 9, 13);
    assert!(up.iter().all(|&v| v == 1 || v == 5));
}

#[test]
fn imagenet_norm_zeroes_the_mean_image() {
    let seq = 3;
    let mut stack = Array3::<f32>::zeros((4, 4, 3 * seq));
    for ch in 0..3 * seq {
        stack
            .slice_mut(s![.., .., ch])
            .fill(image_ops::IMAGENET_MEAN[ch % 3]);
    }

    let norm = image_ops::normalize_imagenet(&stack, seq).unwrap();
    for v in norm.iter() {
        assert!(v.abs() < 1e-6);
    }
}

#[test]
fn imagenet_norm_rejects_wrong_channel_counts() {
    let stack = Array3::<f32>::zeros((4, 4, 7));
    assert!(image_ops::normalize_imagenet(&stack, 3).is_err());
}

#[test]
fn brightness_shift_is_additive_and_clips() {
    let mut image = Array3::from_elem((3, 3, 3), 0.95f32);
    image_ops::adjust_brightness(&mut image, 0.1);
    image_ops::clip_unit(&mut image);
    for v in image.iter() {
        assert!((v - 1.0).abs() < 1e-6);
    }
}

#[test]
fn contrast_stretch_keeps_the_channel_mean() {
    let mut image = ramp_stack(6, 6, 3);
    let before = image.slice(s![.., .., 1]).mean().unwrap();
    image_ops::adjust_contrast(&mut image, 1.15);
    let after = image.slice(s![.., .., 1]).mean().unwrap();
    assert!((before - after).abs() < 1e-5);
}

#[test]
fn saturation_of_a_grey_image_is_a_no_op() {
    let mut image = Array3::from_elem((4, 4, 3), 0.5f32);
    let original = image.clone();
    image_ops::adjust_saturation(&mut image, 1.15).unwrap();
    for (a, b) in image.iter().zip(original.iter()) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn full_hue_rotation_returns_the_original_color() {
    let mut image = Array3::<f32>::zeros((1, 1, 3));
    image[[0, 0, 0]] = 0.8;
    image[[0, 0, 1]] = 0.2;
    image[[0, 0, 2]] = 0.4;
    let original = image.clone();

    image_ops::adjust_hue(&mut image, 1.0).unwrap();
    for (a, b) in image.iter().zip(original.iter()) {
        assert!((a - b).abs() < 1e-4);
    }
}
