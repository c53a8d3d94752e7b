//! different utility modules used throughout the project
/// terminal logger set up from a loglevel string
pub mod logger;
/// parse document with structure like "title1 \n key1: value1, value2 \n key2: value2 \n title2 \n key3: value3" into HashMap
pub mod task_parser;
