mod engagement;
mod persistence;
