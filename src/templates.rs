use maud::{DOCTYPE, Markup, html};

use crate::models::MovieWithReviews;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn report_page(movies: &[MovieWithReviews]) -> String {
    page(
        "Admin - Movies and Reviews",
        html! {
            div class="min-h-screen bg-neutral-900 text-neutral-200" {
                header class="bg-neutral-800 py-6 text-center" {
                    h1 class="text-3xl font-bold" { "Movies and Reviews" }
                }

                @if movies.is_empty() {
                    div class="max-w-2xl mx-auto px-6 py-12" {
                        p class="text-neutral-400" { "No movies catalogued yet." }
                    }
                } @else {
                    div class="max-w-6xl mx-auto grid gap-5 p-5 md:grid-cols-2 lg:grid-cols-3" {
                        @for entry in movies {
                            (movie_card(entry))
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page() -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-neutral-900 flex items-center justify-center" {
                h1 class="text-2xl font-bold text-neutral-200" { "Error loading admin page" }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(entry: &MovieWithReviews) -> Markup {
    let movie = &entry.movie;

    html! {
        div class="flex h-full flex-col rounded-lg bg-neutral-800 p-4 shadow" {
            h2 class="mb-3 text-lg font-semibold text-neutral-100" {
                (movie.title) " (" (year_label(movie.year)) ")"
            }

            @if let Some(url) = &movie.image_url {
                img class="mb-3 max-w-[200px] rounded-lg" src=(url) alt=(movie.title);
            } @else {
                div class="mb-3 flex h-48 w-full items-center justify-center rounded-lg bg-neutral-700 text-neutral-400" {
                    "No Image"
                }
            }

            div class="grow" {
                @if entry.reviews.is_empty() {
                    p class="p-2 text-sm italic text-neutral-400" { "No reviews yet." }
                } @else {
                    @for review in &entry.reviews {
                        div class="my-2 border-l-2 border-blue-500 bg-neutral-700 p-2 text-sm" {
                            div class="font-bold text-amber-400" {
                                (stars(review.rating)) " " (review.rating) "/5"
                            }
                            p class="mt-1 text-neutral-200" { (review.review_text) }
                        }
                    }
                }
            }
        }
    }
}

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
}

// Glyph count is clamped to the five-star scale; the stored rating is shown
// verbatim next to it.
fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
