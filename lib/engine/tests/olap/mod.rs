mod cell_set;
mod test_utils;
