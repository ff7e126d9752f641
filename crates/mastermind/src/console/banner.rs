//! Block-letter banners.

/// Title shown at startup.
pub const TITLE: &str = r"
 __  __    _    ____ _____ _____ ____  __  __ ___ _   _ ____
|  \/  |  / \  / ___|_   _| ____|  _ \|  \/  |_ _| \ | |  _ \
| |\/| | / _ \ \___ \ | | |  _| | |_) | |\/| || ||  \| | | | |
| |  | |/ ___ \ ___) || | | |___|  _ <| |  | || || |\  | |_| |
|_|  |_/_/   \_\____/ |_| |_____|_| \_\_|  |_|___|_| \_|____/
";

/// Shown when the secret is guessed.
pub const YOU_WIN: &str = r"
__   _____  _   _  __        _____ _   _ _
\ \ / / _ \| | | | \ \      / /_ _| \ | | |
 \ V / | | | | | |  \ \ /\ / / | ||  \| | |
  | || |_| | |_| |   \ V  V /  | || |\  |_|
  |_| \___/ \___/     \_/\_/  |___|_| \_(_)
";

/// Shown when attempts run out.
pub const YOU_LOSE: &str = r"
__   _____  _   _   _     ___  ____  _____
\ \ / / _ \| | | | | |   / _ \/ ___|| ____|
 \ V / | | | | | | | |  | | | \___ \|  _|
  | || |_| | |_| | | |__| |_| |___) | |___
  |_| \___/ \___/  |_____\___/|____/|_____|
";

/// Printed on the way out.
pub const FAREWELL: &str = "***Thanks for playing!***";
