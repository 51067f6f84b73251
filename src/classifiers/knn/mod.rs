mod knn;

pub use knn::{Algorithm, KNearestNeighbors, KNearestNeighborsModel, Neighbor, Weights};
