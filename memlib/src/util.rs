use crate::cache::CacheModel;
use crate::memory::MemorySystem;

/// Drives the access pattern of a naive triple-loop matrix-matrix multiply
/// `C = A * B` over `n x n` matrices of 8-byte elements
///
/// Per innermost iteration: read `C[i][j]`, read `A[i][k]`, read `B[k][j]`,
/// write `C[i][j]`. The three matrices are allocated back to back from the
/// system's cursor
pub fn naive_matrix_multiply<C: CacheModel>(n: usize, system: &mut MemorySystem<C>) {
    let a = system.create_doubles(n * n);
    let b = system.create_doubles(n * n);
    let c = system.create_doubles(n * n);

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                c[n * i + j].read(system);
                a[n * i + k].read(system);
                b[n * k + j].read(system);
                c[n * i + j].write(system);
            }
        }
    }
}

/// Reads every `stride`-th 8-byte element of an `n * stride` element array,
/// `passes` times over
pub fn strided_sweep<C: CacheModel>(
    n: usize,
    stride: usize,
    passes: usize,
    system: &mut MemorySystem<C>,
) {
    let variables = system.create_doubles(n * stride);
    for _ in 0..passes {
        for i in 0..n {
            variables[i * stride].read(system);
        }
    }
}
