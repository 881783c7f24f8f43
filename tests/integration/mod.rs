mod helpers;
mod test_list;
mod test_npm;
