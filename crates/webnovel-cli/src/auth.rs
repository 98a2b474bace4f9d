use webnovel_client::ClientContext;
use webnovel_lib::prelude::User;

use crate::{output::Output, prompt};

fn print_user(user: &User) {
    println!("{} <{}> ({:?})", user.username, user.email, user.role);
}

pub async fn login(
    ctx: &ClientContext,
    out: &Output,
    email: &str,
    password: Option<String>,
) -> Result<(), anyhow::Error> {
    let password = prompt::password(password).await?;
    let user = ctx.auth.login(email, &password).await?;
    // pull the account settings while the session is fresh
    if let Err(e) = ctx.settings.sync().await {
        warn!("could not sync settings: {e}");
    }

    out.emit(&user, |user| {
        print!("logged in as ");
        print_user(user);
    })
}

pub async fn register(
    ctx: &ClientContext,
    out: &Output,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), anyhow::Error> {
    let password = prompt::password(password).await?;
    let user = ctx.auth.register(username, email, &password).await?;

    out.emit(&user, |user| {
        print!("registered ");
        print_user(user);
    })
}

pub async fn logout(ctx: &ClientContext, out: &Output) -> Result<(), anyhow::Error> {
    ctx.auth.logout().await?;
    out.message("logged out")
}

pub async fn whoami(ctx: &ClientContext, out: &Output) -> Result<(), anyhow::Error> {
    if !ctx.auth.store().is_authenticated() {
        anyhow::bail!("not logged in");
    }
    let user = ctx.auth.current_user().await?;
    out.emit(&user, print_user)
}
