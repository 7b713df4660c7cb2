pub mod project_map;
