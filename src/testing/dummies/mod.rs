mod mushrooms;

pub use mushrooms::{
    labeled_table, mushroom_like_csv, mushroom_like_records, sequential_table, write_csv,
};
