pub mod org_stars;
