//! User database queries.
//!
//! This module covers `user_info` and `user_login`. Password hashing is left
//! to the server's `pgcrypto` extension: the plain text is sent once and
//! stored as `crypt(password, gen_salt('bf'))`.

use evenue_common::Result;
use postgres::GenericClient;

use crate::models::{NewLogin, NewUser, UserSummary};
use crate::pg_error::db_err;

/// Insert a user.
///
/// # Arguments
///
/// * `client` - Database client or transaction
/// * `user` - The user to insert; validated first
///
/// # Returns
///
/// * `Ok(())` - The user was stored
/// * `Err(Error::InvalidInput)` - If the user fails validation
/// * `Err(Error::Constraint)` - If the email already exists
pub fn insert_user(client: &mut impl GenericClient, user: &NewUser) -> Result<()> {
    user.validate()?;

    client
        .execute(
            "INSERT INTO user_info (email, first_name, last_name, age, country)
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &user.email,
                &user.first_name,
                &user.last_name,
                &user.age,
                &user.country,
            ],
        )
        .map_err(db_err)?;

    tracing::debug!("Inserted user {}", user.email);
    Ok(())
}

/// Store login credentials, hashed with blowfish by the server.
pub fn set_password(client: &mut impl GenericClient, login: &NewLogin) -> Result<()> {
    login.validate()?;

    client
        .execute(
            "INSERT INTO user_login (email, password) VALUES ($1, crypt($2, gen_salt('bf')))",
            &[&login.email, &login.password],
        )
        .map_err(db_err)?;

    Ok(())
}

/// Check a login attempt.
///
/// The input is hashed with the salt embedded in the stored hash and
/// compared to it.
///
/// # Returns
///
/// * `Ok(true)` - The password matches a stored login for `email`
/// * `Ok(false)` - Unknown email or wrong password
/// * `Err(Error)` - If a database error occurs
pub fn verify_password(client: &mut impl GenericClient, email: &str, password: &str) -> Result<bool> {
    let row = client
        .query_one(
            "SELECT EXISTS (
                 SELECT 1 FROM user_login WHERE email = $1 AND password = crypt($2, password)
             )",
            &[&email, &password],
        )
        .map_err(db_err)?;

    row.try_get(0).map_err(db_err)
}

/// Look up a user by email.
///
/// # Returns
///
/// * `Ok(Some(UserSummary))` - The user if found
/// * `Ok(None)` - If the user does not exist
pub fn get_user(client: &mut impl GenericClient, email: &str) -> Result<Option<UserSummary>> {
    let row = client
        .query_opt(
            "SELECT email, first_name, last_name, age FROM user_info WHERE email = $1",
            &[&email],
        )
        .map_err(db_err)?;

    let Some(row) = row else {
        return Ok(None);
    };
    Ok(Some(UserSummary {
        email: row.try_get(0).map_err(db_err)?,
        first_name: row.try_get(1).map_err(db_err)?,
        last_name: row.try_get(2).map_err(db_err)?,
        age: row.try_get(3).map_err(db_err)?,
    }))
}

/// Count all users.
pub fn count_users(client: &mut impl GenericClient) -> Result<i64> {
    let row = client
        .query_one("SELECT COUNT(*) FROM user_info", &[])
        .map_err(db_err)?;
    row.try_get(0).map_err(db_err)
}
