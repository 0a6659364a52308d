//! Built-in name tables for the synthetic dataset.

/// Directors as (name, birth year).
pub static DIRECTORS: &[(&str, i32)] = &[
    ("Christopher Nolan", 1970),
    ("Quentin Tarantino", 1963),
    ("Martin Scorsese", 1942),
    ("Steven Spielberg", 1946),
    ("Denis Villeneuve", 1967),
    ("Greta Gerwig", 1983),
    ("Jordan Peele", 1979),
    ("Rian Johnson", 1973),
    ("Chloe Zhao", 1982),
    ("Bong Joon-ho", 1969),
];

/// Actors as (name, birth year).
pub static ACTORS: &[(&str, i32)] = &[
    ("Leonardo DiCaprio", 1974),
    ("Margot Robbie", 1990),
    ("Ryan Gosling", 1980),
    ("Emma Stone", 1988),
    ("Christian Bale", 1974),
    ("Scarlett Johansson", 1984),
    ("Oscar Isaac", 1979),
    ("Saoirse Ronan", 1994),
    ("Timothee Chalamet", 1995),
    ("Zendaya", 1996),
    ("Daniel Kaluuya", 1989),
    ("Frances McDormand", 1957),
    ("Adam Driver", 1983),
    ("Florence Pugh", 1996),
    ("Michael Shannon", 1974),
];

/// One movie is generated per title.
pub static TITLES: &[&str] = &[
    "Inception Dreams",
    "Pulp Fiction Redux",
    "The Departed Soul",
    "Saving Private Ryan",
    "Dune Awakening",
    "Lady Bird Flies",
    "Get Out Now",
    "Knives Out Sharp",
    "Nomadland Journey",
    "Parasite Rising",
    "Interstellar Voyage",
    "Django Unchained",
    "The Wolf of Wall Street",
    "Schindlers List",
    "Arrival Point",
    "Little Women",
    "Us Together",
    "Glass Onion",
    "The Rider",
    "Memories of Murder",
    "The Dark Knight",
    "Kill Bill Vol. 3",
    "Goodfellas",
    "E.T. Returns",
    "Blade Runner 2049",
    "Barbie World",
    "Nope",
    "Looper",
    "Eternals",
    "Okja",
    "Memento",
    "Reservoir Dogs",
    "Taxi Driver",
    "Jaws",
    "Sicario",
    "Frances Ha",
    "Candyman",
    "Star Wars: Last Jedi",
    "Songs My Brothers",
    "The Host",
    "Tenet",
    "Once Upon a Time",
    "Casino",
    "Munich",
];
