pub mod jar_vis2d;
