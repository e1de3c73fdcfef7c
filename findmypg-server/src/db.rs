use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Postal addresses, shared by owners and PGs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS address (
            address_id SERIAL PRIMARY KEY,
            residence_name VARCHAR(255) NOT NULL DEFAULT '',
            street VARCHAR(255) NOT NULL DEFAULT '',
            area VARCHAR(255) NOT NULL DEFAULT '',
            city VARCHAR(255) NOT NULL DEFAULT '',
            state VARCHAR(255) NOT NULL DEFAULT '',
            zip VARCHAR(20) NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS owner (
            owner_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL CONSTRAINT owner_email_key UNIQUE,
            mobile VARCHAR(20) NOT NULL DEFAULT '',
            password VARCHAR(255) NOT NULL,
            image TEXT,
            no_of_pg_hold INTEGER,
            gender VARCHAR(20),
            aadhar_card BIGINT,
            address_id INTEGER REFERENCES address(address_id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL CONSTRAINT users_email_key UNIQUE,
            phone VARCHAR(20) NOT NULL DEFAULT '',
            password VARCHAR(255) NOT NULL,
            gender VARCHAR(20),
            profile_image TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pg (
            pg_id SERIAL PRIMARY KEY,
            owner_id INTEGER NOT NULL REFERENCES owner(owner_id),
            pg_name VARCHAR(255) NOT NULL,
            address_id INTEGER REFERENCES address(address_id) ON DELETE SET NULL,
            map_location TEXT,
            description TEXT,
            operating_since DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS room (
            room_id SERIAL PRIMARY KEY,
            pg_id INTEGER NOT NULL REFERENCES pg(pg_id),
            room_type VARCHAR(100) NOT NULL,
            available_room INTEGER NOT NULL DEFAULT 0,
            room_size VARCHAR(100) NOT NULL,
            person_type VARCHAR(100) NOT NULL,
            gender VARCHAR(20) NOT NULL,
            no_of_rooms INTEGER NOT NULL,
            rent INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // room_id is NULL for PG-level pictures
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS images (
            image_id SERIAL PRIMARY KEY,
            pg_id INTEGER NOT NULL REFERENCES pg(pg_id),
            room_id INTEGER REFERENCES room(room_id),
            image_path TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pg_facilities (
            pg_id INTEGER PRIMARY KEY REFERENCES pg(pg_id),
            food BOOLEAN NOT NULL DEFAULT FALSE,
            free_wifi BOOLEAN NOT NULL DEFAULT FALSE,
            library BOOLEAN NOT NULL DEFAULT FALSE,
            parking BOOLEAN NOT NULL DEFAULT FALSE,
            lift BOOLEAN NOT NULL DEFAULT FALSE,
            daily_cleaning BOOLEAN NOT NULL DEFAULT FALSE,
            tv_lounge BOOLEAN NOT NULL DEFAULT FALSE,
            laundry BOOLEAN NOT NULL DEFAULT FALSE,
            ironing BOOLEAN NOT NULL DEFAULT FALSE,
            kitchen BOOLEAN NOT NULL DEFAULT FALSE,
            dining_area BOOLEAN NOT NULL DEFAULT FALSE,
            gym BOOLEAN NOT NULL DEFAULT FALSE,
            ground BOOLEAN NOT NULL DEFAULT FALSE,
            cafeteria BOOLEAN NOT NULL DEFAULT FALSE,
            swimming_pool BOOLEAN NOT NULL DEFAULT FALSE,
            game_zone BOOLEAN NOT NULL DEFAULT FALSE,
            cab_facility BOOLEAN NOT NULL DEFAULT FALSE,
            _24_x_7_water BOOLEAN NOT NULL DEFAULT FALSE,
            _24_x_7_electricity BOOLEAN NOT NULL DEFAULT FALSE,
            hot_water BOOLEAN NOT NULL DEFAULT FALSE,
            ro_purifier BOOLEAN NOT NULL DEFAULT FALSE,
            water_cooler BOOLEAN NOT NULL DEFAULT FALSE,
            cctv BOOLEAN NOT NULL DEFAULT FALSE,
            security_warden BOOLEAN NOT NULL DEFAULT FALSE,
            medical_services BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS room_facilities (
            room_id INTEGER PRIMARY KEY REFERENCES room(room_id),
            ac BOOLEAN NOT NULL DEFAULT FALSE,
            tv BOOLEAN NOT NULL DEFAULT FALSE,
            wifi BOOLEAN NOT NULL DEFAULT FALSE,
            fridge BOOLEAN NOT NULL DEFAULT FALSE,
            attached_bathroom BOOLEAN NOT NULL DEFAULT FALSE,
            attached_toilets BOOLEAN NOT NULL DEFAULT FALSE,
            balcony BOOLEAN NOT NULL DEFAULT FALSE,
            wardrobe BOOLEAN NOT NULL DEFAULT FALSE,
            safety_locker BOOLEAN NOT NULL DEFAULT FALSE,
            study_table BOOLEAN NOT NULL DEFAULT FALSE,
            mattress BOOLEAN NOT NULL DEFAULT FALSE,
            bed_sheets BOOLEAN NOT NULL DEFAULT FALSE,
            pillows BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rules (
            pg_id INTEGER PRIMARY KEY REFERENCES pg(pg_id),
            visitor_allowed BOOLEAN NOT NULL DEFAULT FALSE,
            non_veg BOOLEAN NOT NULL DEFAULT FALSE,
            other_gender BOOLEAN NOT NULL DEFAULT FALSE,
            smoking BOOLEAN NOT NULL DEFAULT FALSE,
            drinking BOOLEAN NOT NULL DEFAULT FALSE,
            party BOOLEAN NOT NULL DEFAULT FALSE,
            gate_close_time VARCHAR(20)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS other_charges (
            pg_id INTEGER PRIMARY KEY REFERENCES pg(pg_id),
            electricity INTEGER,
            laundry INTEGER,
            food INTEGER,
            deposit_amount INTEGER,
            refundable BOOLEAN NOT NULL DEFAULT FALSE,
            notice_period INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Bookings keep their own copy of PG and renter details, so no foreign keys
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            booking_id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            pg_id INTEGER NOT NULL,
            pg_name VARCHAR(255),
            address TEXT,
            room_type VARCHAR(100),
            room_id INTEGER,
            amount DOUBLE PRECISION,
            check_in_date DATE NOT NULL,
            check_out_date DATE NOT NULL,
            status VARCHAR(50) NOT NULL DEFAULT 'pending',
            booking_date DATE NOT NULL DEFAULT CURRENT_DATE,
            user_name VARCHAR(255),
            user_gender VARCHAR(20),
            user_email VARCHAR(255),
            user_phone VARCHAR(20),
            special_requests TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS saved_pgs (
            user_id INTEGER NOT NULL REFERENCES users(user_id),
            pg_id INTEGER NOT NULL REFERENCES pg(pg_id),
            saved_on TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (user_id, pg_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pg_owner_id ON pg(owner_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_room_pg_id ON room(pg_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_images_pg_id ON images(pg_id, room_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_pg_id ON bookings(pg_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
