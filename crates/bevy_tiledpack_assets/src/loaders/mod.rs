pub mod tileset;
