pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS manufacturer (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    country TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS driver (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    license_number TEXT NOT NULL UNIQUE,
    date_joined TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS car (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model TEXT NOT NULL,
    manufacturer_id INTEGER NOT NULL REFERENCES manufacturer(id) ON DELETE CASCADE
);

-- Assignment relation; neither side owns it
CREATE TABLE IF NOT EXISTS car_drivers (
    car_id INTEGER NOT NULL REFERENCES car(id) ON DELETE CASCADE,
    driver_id INTEGER NOT NULL REFERENCES driver(id) ON DELETE CASCADE,
    PRIMARY KEY (car_id, driver_id)
);

CREATE TABLE IF NOT EXISTS session (
    token BLOB PRIMARY KEY,
    driver_id INTEGER NOT NULL REFERENCES driver(id) ON DELETE CASCADE,
    num_visits INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_car_manufacturer ON car(manufacturer_id);
CREATE INDEX IF NOT EXISTS idx_car_drivers_driver ON car_drivers(driver_id);
CREATE INDEX IF NOT EXISTS idx_session_driver ON session(driver_id);
"#;
