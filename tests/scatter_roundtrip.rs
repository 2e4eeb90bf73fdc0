use mesh_exec::array::indexable::{Indexable, IndexableMut};
use mesh_exec::ops::scatter::ScatterOp;

#[test]
fn host_reference_roundtrip() {
    let input = [8.0f64, 5.0, 9.0];
    let indices = [2u32, 1, 4];
    let mut output = [0.0f64; 5];
    ScatterOp::new(
        [Indexable::new(&input)],
        [IndexableMut::new(&mut output)],
        Indexable::new(&indices),
        3,
    )
    .run_host()
    .unwrap();
    assert_eq!(output, [0.0, 5.0, 8.0, 0.0, 9.0]);
}

#[test]
fn host_scatter_is_idempotent() {
    let input = [8i32, 5, 9];
    let indices = [2u32, 1, 4];
    let mut once = [0i32; 5];
    let mut twice = [0i32; 5];
    for (output, reps) in [(&mut once, 1), (&mut twice, 2)] {
        for _ in 0..reps {
            ScatterOp::new(
                [Indexable::new(&input)],
                [IndexableMut::new(&mut output[..])],
                Indexable::new(&indices),
                3,
            )
            .run_host()
            .unwrap();
        }
    }
    assert_eq!(once, twice);
}

#[test]
fn permutation_scatter_preserves_all_values() {
    let n = 512usize;
    let input: Vec<f32> = (0..n).map(|i| i as f32).collect();
    // reverse permutation
    let indices: Vec<u32> = (0..n as u32).rev().collect();
    let mut output = vec![-1.0f32; n];
    ScatterOp::new(
        [Indexable::new(&input)],
        [IndexableMut::new(&mut output)],
        Indexable::new(&indices),
        n,
    )
    .run_host()
    .unwrap();
    for i in 0..n {
        assert_eq!(output[n - 1 - i], i as f32);
    }
}

#[cfg(feature = "wgpu-support")]
mod accelerator {
    use super::*;
    use mesh_exec::backend::accelerator_available;

    #[test]
    fn accelerator_matches_host_byte_for_byte() {
        if !accelerator_available() {
            eprintln!("no accelerator adapter; skipping");
            return;
        }
        let input = [8.0f32, 5.0, 9.0];
        let indices = [2u32, 1, 4];

        let mut host_out = [0.0f32; 5];
        ScatterOp::new(
            [Indexable::new(&input)],
            [IndexableMut::new(&mut host_out)],
            Indexable::new(&indices),
            3,
        )
        .run_host()
        .unwrap();

        let mut gpu_out = [0.0f32; 5];
        ScatterOp::new(
            [Indexable::new(&input)],
            [IndexableMut::new(&mut gpu_out)],
            Indexable::new(&indices),
            3,
        )
        .run_accelerator()
        .unwrap();

        assert_eq!(host_out, [0.0, 5.0, 8.0, 0.0, 9.0]);
        assert_eq!(
            bytemuck::cast_slice::<f32, u8>(&host_out),
            bytemuck::cast_slice::<f32, u8>(&gpu_out)
        );
    }

    #[test]
    fn accelerator_keeps_untouched_positions() {
        if !accelerator_available() {
            eprintln!("no accelerator adapter; skipping");
            return;
        }
        let input = [1u32, 2];
        let indices = [0u32, 3];
        let mut output = [9u32, 9, 9, 9];
        ScatterOp::new(
            [Indexable::new(&input)],
            [IndexableMut::new(&mut output)],
            Indexable::new(&indices),
            2,
        )
        .run_accelerator()
        .unwrap();
        assert_eq!(output, [1, 9, 9, 2]);
    }
}
