//! Registration, signup, login and profile commands.

use anyhow::Result;

use portal::handlers::dashboard::Dashboard;
use portal::handlers::login::{self, LoginForm};
use portal::handlers::registration::{self, RegistrationForm};
use portal::handlers::signup::{self, SignupForm};
use portal::model::Role;
use portal::Portal;

use super::report;

pub struct RegisterArgs {
    pub role: Option<Role>,
    pub name: String,
    pub email: String,
    pub roll: String,
    pub employee_id: String,
    pub department: String,
    pub password: String,
    pub confirm: String,
    pub agree: bool,
}

pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub roll: String,
    pub employee_id: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub confirm: String,
    pub agree: bool,
    pub ack_security: bool,
}

/// Unified registration form.
pub fn register(portal: &Portal, args: RegisterArgs) -> Result<()> {
    registration::visit(portal)?;
    if let Some(role) = args.role {
        registration::select_role(portal, role)?;
    }

    let outcome = registration::submit(
        portal,
        &RegistrationForm {
            role: args.role,
            full_name: args.name,
            college_email: args.email,
            password: args.password,
            confirm_password: args.confirm,
            roll_number: args.roll,
            employee_id: args.employee_id,
            department: args.department,
            terms: args.agree,
        },
    )?;
    report(outcome)
}

/// Role signup page. Staff pages carry the security acknowledgement.
pub fn signup(portal: &Portal, role: Role, args: SignupArgs) -> Result<()> {
    signup::visit(portal, role)?;

    let outcome = signup::submit(
        portal,
        role,
        &SignupForm {
            full_name: args.name,
            email: args.email,
            roll_number: args.roll,
            employee_id: args.employee_id,
            department: args.department,
            phone: args.phone,
            password: args.password,
            confirm_password: args.confirm,
            terms: args.agree,
            security: role.is_staff().then_some(args.ack_security),
        },
    )?;
    report(outcome)
}

pub fn login(portal: &Portal, email: String, password: String) -> Result<()> {
    login::visit(portal)?;
    let outcome = login::submit(portal, &LoginForm { email, password })?;
    report(outcome)
}

pub fn whoami(portal: &Portal, dev_mode: bool, json_output: bool) -> Result<()> {
    let Some(session) = portal.session.current()? else {
        println!("Not logged in.");
        return Ok(());
    };
    let profile = Dashboard::new(portal, dev_mode).profile()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let role = session.role.map(|r| r.as_str()).unwrap_or("unknown");
    println!("Name:      {}", profile.name);
    println!("Roll:      {}", profile.roll);
    println!("Email:     {}", session.email);
    println!("Role:      {role}");
    println!("Logged in: {}", session.login_time);
    Ok(())
}
