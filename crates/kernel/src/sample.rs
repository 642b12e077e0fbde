//! Static sample geometry served to the browser viewer.

/// Half the edge length of the sample cube.
const CUBE_HALF_SIZE: i32 = 50;
/// Where the sample cube is centred.
const CUBE_CENTER: [i32; 3] = [0, -100, 150];

/// The eight vertices of the sample cube.
///
/// Ordered with x varying slowest and z fastest, so vertex `i` has bit 2 set
/// for +x, bit 1 for +y and bit 0 for +z.
pub fn cube_points() -> Vec<[i32; 3]> {
    let corners = [-CUBE_HALF_SIZE, CUBE_HALF_SIZE];
    let mut points = Vec::with_capacity(8);
    for x in corners {
        for y in corners {
            for z in corners {
                points.push([x + CUBE_CENTER[0], y + CUBE_CENTER[1], z + CUBE_CENTER[2]]);
            }
        }
    }
    points
}

/// The twelve edges of the sample cube as index pairs into [`cube_points`].
pub fn cube_edges() -> Vec<[usize; 2]> {
    vec![
        // -x face
        [0, 1],
        [1, 3],
        [3, 2],
        [2, 0],
        // +x face
        [4, 5],
        [5, 7],
        [7, 6],
        [6, 4],
        // connecting
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ]
}
