mod query;
mod test_utils;
