//! Conversion between cell ordinals and cell coordinates.
//!
//! The cell grid is addressed in mixed radix: the radix of an axis is its number of positions and
//! axis 0 is the least significant digit. A grid without axes has a single cell.

use rdf_olap_model::{OlapError, OlapResult};

/// Returns the number of cells of a grid whose axes have the given sizes.
pub fn cell_count(axis_sizes: &[usize]) -> usize {
    axis_sizes.iter().product()
}

/// Converts a cell ordinal into one coordinate per axis.
pub fn ordinal_to_coordinates(axis_sizes: &[usize], ordinal: usize) -> OlapResult<Vec<usize>> {
    let size = cell_count(axis_sizes);
    if ordinal >= size {
        return Err(OlapError::IndexOutOfBounds {
            index: ordinal,
            size,
        });
    }

    let mut remainder = ordinal;
    let coordinates = axis_sizes
        .iter()
        .map(|axis_size| {
            let coordinate = remainder % axis_size;
            remainder /= axis_size;
            coordinate
        })
        .collect();
    Ok(coordinates)
}

/// Converts one coordinate per axis into a cell ordinal.
pub fn coordinates_to_ordinal(axis_sizes: &[usize], coordinates: &[usize]) -> OlapResult<usize> {
    if coordinates.len() != axis_sizes.len() {
        return Err(OlapError::IndexOutOfBounds {
            index: coordinates.len(),
            size: axis_sizes.len(),
        });
    }

    let mut ordinal = 0;
    let mut factor = 1;
    for (&coordinate, &axis_size) in coordinates.iter().zip(axis_sizes) {
        if coordinate >= axis_size {
            return Err(OlapError::IndexOutOfBounds {
                index: coordinate,
                size: axis_size,
            });
        }
        ordinal += coordinate * factor;
        factor *= axis_size;
    }
    Ok(ordinal)
}
