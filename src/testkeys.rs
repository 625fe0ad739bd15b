//! Fixed certificates for tests, in `x5c` form (base64 DER, no wrapping).
//!
//! Generated once with openssl:
//! `openssl req -x509 -newkey rsa:2048 -nodes -subj "/CN=idp-test" | openssl x509 -outform DER | base64 -w0`
//! and the prime256v1 equivalent for the EC one.

/// Self-signed RSA-2048 certificate.
pub const RSA_X5C: &str = "MIIDBzCCAe+gAwIBAgIUEFax1pbkLtOv9FG6b76QCVafm5MwDQYJKoZIhvcNAQELBQAwEzERMA8GA1UEAwwIaWRwLXRlc3QwHhcNMjYwODAyMDYyMTM0WhcNNDYwNzI4MDYyMTM0WjATMREwDwYDVQQDDAhpZHAtdGVzdDCCASIwDQYJKoZIhvcNAQEBBQADggEPADCCAQoCggEBAMKkfhvH0OJa88EryG44O2TjnTSEL5MTZ1hNs9pwc+RZKxoix5U0sQx3EbMslDOafSCjy0WufXyZ0c4K+Tp//0N7YVqXqMTe7a9QOjj2tTCUDvkiouXRk3tUKG7HEBbLv8DAJguGH6wCN0BFFLBQYvbA3sthzYtLPgTyk8PgrssR1N7LE4A3p6Y55m36tc2UAC/D3bL+JDVrTELnrIIm4q4r3tUze1BB3b2j3rs3ZWMx70CndAS6G7RHrAout5a9gv9nWnOOlYcGdjJ6Ls9y/PrdHAfsDdUmjuzAIpJKuK3hhjVTc3yUo+8rZGaeeMqiuVB7N7ORHV8r7EariM1AiG0CAwEAAaNTMFEwHQYDVR0OBBYEFM8B9T0bn/FJ8f6PINFiImqccbOgMB8GA1UdIwQYMBaAFM8B9T0bn/FJ8f6PINFiImqccbOgMA8GA1UdEwEB/wQFMAMBAf8wDQYJKoZIhvcNAQELBQADggEBAL+mc3xEl+86y69qlv/pcBGGEp155etMKXDj7lCmYNPk3Ho87bVgorZX98blPrhbKAIZy8hQpbn+XpKj7b8lWX1C9+awR/nCBupqfH9ezq9pVA/lZfo6tvT8sSKUXKeq9Z/Xj3jHoIz5iUUB2uMESz/NcogQT4WF0n2gVdE+oKltwgUZaQlJineaRVQxfULSan6/Ohyz4j6mGuFS82DwM9NKVZeJQhWjw3gATGhnAqrfhIwETAdOVfm3oe7HlsegHFv2lU3ftqVuzKd85WOLwLEEvxXn7XUP90ULW7QrLHjX9hYJx/LOaQYdiEwqRjoL0yrFADJt0tKv1RUVgd/GQQ0=";

/// Self-signed prime256v1 (P-256) certificate.
pub const EC_X5C: &str = "MIIBgjCCASegAwIBAgIUB/ImCrVmPudh9vm7LEVeD8Dluh0wCgYIKoZIzj0EAwIwFjEUMBIGA1UEAwwLaWRwLXRlc3QtZWMwHhcNMjYwODAyMDYyMTM0WhcNNDYwNzI4MDYyMTM0WjAWMRQwEgYDVQQDDAtpZHAtdGVzdC1lYzBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABJmJ4o2TjxlfRjyy6fEH8XDdPPR3R8V8Dqm+CqA7G/dtuI7cLmt4tTwqcggh/EvWA64r9WzBEjW2eTMd9MUir6ajUzBRMB0GA1UdDgQWBBS7iocedsX3GYwFzIrnUTnPmvVjmzAfBgNVHSMEGDAWgBS7iocedsX3GYwFzIrnUTnPmvVjmzAPBgNVHRMBAf8EBTADAQH/MAoGCCqGSM49BAMCA0kAMEYCIQCwVD/x7ZaXNiy73Uu/uQTPSfjqwAzHhDg2edB5tpycsQIhAJsCRGxtc9bidsVXYA41+Wyv4ptWzycWZDpnRgHfU6Jp";
