mod test_interpreter_basic;
mod test_transform_basic;
