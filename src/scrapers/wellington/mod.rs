pub mod city_gallery;
pub mod san_fran;
