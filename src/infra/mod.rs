pub mod fileset;
