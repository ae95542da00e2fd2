//! Properties of the generated sphere strip, checked through the public API.

use orb_ngin::sphere::{self, Vertex, vertex_count};

fn ring_z(vertex: &Vertex) -> f32 {
    vertex.normal[2]
}

#[test]
fn strip_length_is_two_stacks_slices_plus_one() {
    for (radius, slices, stacks) in [(0.5, 3, 2), (1.0, 16, 16), (0.8, 40, 40), (10.0, 7, 13)] {
        let vertices = sphere::generate(radius, slices, stacks);
        assert_eq!(vertices.len(), vertex_count(slices, stacks));
    }
}

#[test]
fn pairs_alternate_between_adjacent_latitude_rings() {
    let slices = 10;
    let stacks = 6;
    let drho = std::f32::consts::PI / stacks as f32;
    let vertices = sphere::generate(1.0, slices, stacks);

    for i in 0..stacks {
        let rho = i as f32 * drho;
        for j in 0..=slices {
            let pair = (i * (slices + 1) + j) as usize * 2;
            // Even strip vertices stay on the stack's ring, odd ones on the
            // next ring; this alternation is what keeps the strip continuous.
            assert!((ring_z(&vertices[pair]) - rho.cos()).abs() < 1e-5);
            assert!((ring_z(&vertices[pair + 1]) - (rho + drho).cos()).abs() < 1e-5);
        }
    }
}

#[test]
fn closing_slice_repeats_the_first_azimuth() {
    let slices = 12;
    let stacks = 5;
    let vertices = sphere::generate(1.0, slices, stacks);

    for i in 0..stacks {
        let first = (i * (slices + 1)) as usize * 2;
        let last = (i * (slices + 1) + slices) as usize * 2;
        // Positions coincide so the seam has no gap; only `s` differs.
        assert_eq!(vertices[first].position, vertices[last].position);
        assert_eq!(vertices[first].normal, vertices[last].normal);
        assert_eq!(vertices[first].tex_coords[0], 1.0);
        assert!(vertices[last].tex_coords[0].abs() < 1e-6);
    }
}

#[test]
fn default_globe_subdivision() {
    let vertices = sphere::generate(0.8, 40, 40);
    assert_eq!(vertices.len(), 3280);
    assert_eq!(vertices[0].position, [0.0, 0.0, 0.8]);
    assert_eq!(vertices[0].tex_coords, [1.0, 0.0]);
}

#[test]
fn color_channel_is_reserved_but_zeroed() {
    for vertex in sphere::generate(1.0, 6, 4) {
        assert_eq!(vertex.color, [0.0; 4]);
    }
}
