//! High-dimensional Gaussian filtering on the permutohedral lattice.
//!
//! Each feature vector is embedded into the `(d+1)`-dimensional lattice and
//! splatted onto the vertices of its enclosing simplex with barycentric
//! weights. Values are then blurred along each lattice axis with a
//! `[1/2, 1, 1/2]` stencil and sliced back at the original positions. The
//! result approximates `out_i = Σ_j exp(-|f_i - f_j|² / 2) · in_j` in
//! `O(N·d²)` instead of `O(N²)`.
//!
//! Features must already be divided by the kernel's standard deviations.
//!
//! Reference: Adams, Baek, Davis, "Fast High-Dimensional Filtering Using the
//! Permutohedral Lattice", Eurographics 2010.

use ndarray::{Array2, ArrayView2, Zip};
use std::collections::HashMap;

/// Index of the always-zero vertex used for missing blur neighbors.
const EMPTY_VERTEX: usize = 0;

/// Lattice vertex table. Vertex ids start at 1; id 0 is [`EMPTY_VERTEX`].
#[derive(Debug)]
struct VertexTable {
    key_len: usize,
    index: HashMap<Vec<i32>, usize>,
    keys: Vec<i32>,
}

impl VertexTable {
    fn new(key_len: usize, capacity: usize) -> Self {
        Self {
            key_len,
            index: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity * key_len),
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn insert(&mut self, key: &[i32]) -> usize {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = self.index.len() + 1;
        self.index.insert(key.to_vec(), id);
        self.keys.extend_from_slice(key);
        id
    }

    fn find(&self, key: &[i32]) -> usize {
        self.index.get(key).copied().unwrap_or(EMPTY_VERTEX)
    }

    fn key(&self, id: usize) -> &[i32] {
        let start = (id - 1) * self.key_len;
        &self.keys[start..start + self.key_len]
    }
}

/// Permutohedral lattice built over a fixed set of feature vectors.
#[derive(Debug, Clone)]
pub struct PermutohedralLattice {
    /// Feature dimensionality `d`.
    dim: usize,
    /// Number of feature vectors `N`.
    num_points: usize,
    /// Number of lattice vertices (excluding the empty vertex).
    num_vertices: usize,
    /// `N × (d+1)` vertex ids of each point's enclosing simplex.
    offsets: Vec<usize>,
    /// `N × (d+1)` barycentric weights matching `offsets`.
    barycentric: Vec<f32>,
    /// `(d+1) × M` pairs of neighbor ids along each lattice axis.
    blur_neighbors: Vec<(usize, usize)>,
}

impl PermutohedralLattice {
    /// Builds the lattice for `features`, an `N × d` matrix (one row per point).
    pub fn new(features: ArrayView2<'_, f32>) -> Self {
        let (num_points, dim) = features.dim();
        let d1 = dim + 1;

        let mut table = VertexTable::new(dim, num_points);
        let mut offsets = vec![EMPTY_VERTEX; num_points * d1];
        let mut barycentric = vec![0.0f32; num_points * d1];

        // Canonical simplex: row r holds the remainder-r vertex offsets.
        let mut canonical = vec![0i32; d1 * d1];
        for i in 0..=dim {
            for j in 0..=dim - i {
                canonical[i * d1 + j] = i as i32;
            }
            for j in dim - i + 1..=dim {
                canonical[i * d1 + j] = i as i32 - d1 as i32;
            }
        }

        // Diagonal of the embedding matrix E, scaled to the expected filter std.
        let inv_std_dev = (2.0f32 / 3.0).sqrt() * d1 as f32;
        let scale_factor: Vec<f32> = (0..dim)
            .map(|i| inv_std_dev / (((i + 2) * (i + 1)) as f32).sqrt())
            .collect();

        let down_factor = 1.0 / d1 as f32;
        let up_factor = d1 as f32;

        let mut elevated = vec![0.0f32; d1];
        let mut rem0 = vec![0i32; d1];
        let mut rank = vec![0i32; d1];
        let mut bary = vec![0.0f32; d1 + 1];
        let mut key = vec![0i32; dim];

        for (k, feature) in features.outer_iter().enumerate() {
            // Elevate onto the hyperplane x·1 = 0.
            let mut sm = 0.0f32;
            for j in (1..=dim).rev() {
                let cf = feature[j - 1] * scale_factor[j - 1];
                elevated[j] = sm - j as f32 * cf;
                sm += cf;
            }
            elevated[0] = sm;

            // Closest remainder-0 point by rounding each coordinate to a multiple of d+1.
            let mut sum = 0i32;
            for i in 0..d1 {
                let v = down_factor * elevated[i];
                let up = v.ceil() * up_factor;
                let down = v.floor() * up_factor;
                let rounded = if up - elevated[i] < elevated[i] - down {
                    up
                } else {
                    down
                };
                rem0[i] = rounded as i32;
                sum += rem0[i] / d1 as i32;
            }

            // Rank coordinates by their residual to find the enclosing simplex.
            rank.fill(0);
            for i in 0..dim {
                let di = elevated[i] - rem0[i] as f32;
                for j in i + 1..d1 {
                    if di < elevated[j] - rem0[j] as f32 {
                        rank[i] += 1;
                    } else {
                        rank[j] += 1;
                    }
                }
            }

            // Bring the rounded point back onto the hyperplane.
            for i in 0..d1 {
                rank[i] += sum;
                if rank[i] < 0 {
                    rank[i] += d1 as i32;
                    rem0[i] += d1 as i32;
                } else if rank[i] > dim as i32 {
                    rank[i] -= d1 as i32;
                    rem0[i] -= d1 as i32;
                }
            }

            bary.fill(0.0);
            for i in 0..d1 {
                let v = (elevated[i] - rem0[i] as f32) * down_factor;
                let r = rank[i] as usize;
                bary[dim - r] += v;
                bary[dim - r + 1] -= v;
            }
            bary[0] += 1.0 + bary[d1];

            for remainder in 0..d1 {
                for i in 0..dim {
                    key[i] = rem0[i] + canonical[remainder * d1 + rank[i] as usize];
                }
                offsets[k * d1 + remainder] = table.insert(&key);
                barycentric[k * d1 + remainder] = bary[remainder];
            }
        }

        let num_vertices = table.len();
        let mut blur_neighbors = vec![(EMPTY_VERTEX, EMPTY_VERTEX); d1 * num_vertices];
        let mut n1 = vec![0i32; dim];
        let mut n2 = vec![0i32; dim];
        for axis in 0..d1 {
            for vertex in 1..=num_vertices {
                let key = table.key(vertex);
                for k in 0..dim {
                    n1[k] = key[k] - 1;
                    n2[k] = key[k] + 1;
                }
                if axis < dim {
                    n1[axis] = key[axis] + dim as i32;
                    n2[axis] = key[axis] - dim as i32;
                }
                blur_neighbors[axis * num_vertices + vertex - 1] = (table.find(&n1), table.find(&n2));
            }
        }

        tracing::debug!(
            "Permutohedral lattice: {} points, {} features, {} vertices",
            num_points,
            dim,
            num_vertices
        );

        Self {
            dim,
            num_points,
            num_vertices,
            offsets,
            barycentric,
            blur_neighbors,
        }
    }

    /// Feature dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of points the lattice was built over.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Number of occupied lattice vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Filters `values`, an `N × V` matrix, returning a new `N × V` matrix.
    ///
    /// Splatting is sequential so that vertex sums are accumulated in a fixed
    /// order; blurring and slicing run in parallel with one writer per row.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one row per lattice point.
    pub fn compute(&self, values: ArrayView2<'_, f32>) -> Array2<f32> {
        assert_eq!(
            values.nrows(),
            self.num_points,
            "lattice built for {} points, got {} rows",
            self.num_points,
            values.nrows()
        );
        let d1 = self.dim + 1;
        let value_size = values.ncols();
        let m = self.num_vertices;

        // Splat
        let mut vertices = Array2::<f32>::zeros((m + 1, value_size));
        for (i, row) in values.outer_iter().enumerate() {
            for j in 0..d1 {
                let o = self.offsets[i * d1 + j];
                let w = self.barycentric[i * d1 + j];
                vertices.row_mut(o).scaled_add(w, &row);
            }
        }

        // Blur
        let mut blurred = Array2::<f32>::zeros((m + 1, value_size));
        for axis in 0..d1 {
            let neighbors = &self.blur_neighbors[axis * m..(axis + 1) * m];
            let source = &vertices;
            Zip::indexed(blurred.rows_mut()).par_for_each(|vertex, mut out| {
                if vertex == EMPTY_VERTEX {
                    return;
                }
                let (n1, n2) = neighbors[vertex - 1];
                Zip::from(&mut out)
                    .and(source.row(vertex))
                    .and(source.row(n1))
                    .and(source.row(n2))
                    .for_each(|o, &v, &a, &b| *o = v + 0.5 * (a + b));
            });
            std::mem::swap(&mut vertices, &mut blurred);
        }

        // Slice
        let alpha = 1.0 / (1.0 + 2.0f32.powi(-(self.dim as i32)));
        let mut out = Array2::<f32>::zeros((self.num_points, value_size));
        Zip::indexed(out.rows_mut()).par_for_each(|i, mut row| {
            for j in 0..d1 {
                let o = self.offsets[i * d1 + j];
                let w = self.barycentric[i * d1 + j] * alpha;
                row.scaled_add(w, &vertices.row(o));
            }
        });

        out
    }
}
