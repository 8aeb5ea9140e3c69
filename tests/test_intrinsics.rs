extern crate seq_loader;

use ndarray::s;
use seq_loader::Intrinsics;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn csv_row_maps_onto_the_camera_essentials() {
    let k = Intrinsics::from_csv_row("100.0,0,20.5, 0,110.0,15.25, 0,0,1").unwrap();
    assert!(close(k.fx, 100.0));
    assert!(close(k.fy, 110.0));
    assert!(close(k.cx, 20.5));
    assert!(close(k.cy, 15.25));
}

#[test]
fn csv_row_rejects_wrong_arity_and_garbage() {
    assert!(Intrinsics::from_csv_row("1,2,3").is_err());
    assert!(Intrinsics::from_csv_row("a,b,c,d,e,f,g,h,i").is_err());
}

#[test]
fn matrix_round_trip() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0);
    let m = k.to_matrix();
    assert_eq!(m.shape(), &[3, 3]);
    assert!(close(m[[0, 0]], 100.0));
    assert!(close(m[[2, 2]], 1.0));
    assert_eq!(Intrinsics::from_matrix(&m).unwrap(), k);
}

#[test]
fn scale_level_zero_is_identity() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0);
    assert_eq!(k.at_scale(0), k);
}

#[test]
fn scale_level_halves_per_pyramid_step() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 16.0);
    let down = k.at_scale(3);
    assert!(close(down.fx, 12.5));
    assert!(close(down.fy, 13.75));
    assert!(close(down.cx, 2.5));
    assert!(close(down.cy, 2.0));
}

#[test]
fn flipping_twice_restores_the_principal_point() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0);
    let twice = k.flipped(416.0).flipped(416.0);
    assert!(close(twice.cx, k.cx));
    assert!(close(twice.fx, k.fx));
}

#[test]
fn inverse_times_matrix_is_identity() {
    let k = Intrinsics::new(241.67, 246.3, 204.4, 59.8);
    let product = k.inverse_matrix().dot(&k.to_matrix());
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(close(product[[i, j]], expected), "at ({i}, {j}): {}", product[[i, j]]);
        }
    }
}

#[test]
fn scaling_follows_the_image_resize() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0).scaled(1.1, 1.05);
    assert!(close(k.fx, 110.0));
    assert!(close(k.fy, 115.5));
    assert!(close(k.cx, 22.0));
    assert!(close(k.cy, 15.75));
}

#[test]
fn cropping_shifts_the_principal_point() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0).cropped(4.0, 6.0);
    assert!(close(k.fx, 100.0));
    assert!(close(k.cx, 16.0));
    assert!(close(k.cy, 9.0));
}

#[test]
fn multi_scale_stack_holds_one_matrix_per_level() {
    let k = Intrinsics::new(100.0, 110.0, 20.0, 15.0);
    let stack = k.multi_scale(4);
    assert_eq!(stack.shape(), &[4, 3, 3]);
    for level in 0..4 {
        let factor = (1u32 << level) as f32;
        assert!(close(stack[[level, 0, 0]], 100.0 / factor));
        assert!(close(stack[[level, 1, 2]], 15.0 / factor));
        assert!(close(stack[[level, 2, 2]], 1.0));
    }

    let inv = k.multi_scale_inverse(4);
    assert_eq!(inv.shape(), &[4, 3, 3]);
    let level1: ndarray::ArrayView2<f32> = inv.slice(s![1, .., ..]);
    let product: ndarray::Array2<f32> = level1.dot(&stack.slice(s![1, .., ..]));
    assert!(close(product[[0, 0]], 1.0));
    assert!(close(product[[0, 2]], 0.0));
}
